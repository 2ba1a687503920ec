//! Sift Observability
//!
//! Logging setup shared by the Sift binaries.
//!
//! # Examples
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     sift_observability::init_logging()?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::init_logging;
