//! Output helpers for `sift-cli`.

pub mod report;
