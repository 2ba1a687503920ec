//! Connection lifecycle metrics.
//!
//! These are no-ops until a recorder is installed (for example the
//! Prometheus exporter in `sift-cli`).

use metrics::{counter, gauge};

use crate::stats::ConnectionStats;

pub fn track_connect_success() {
    counter!("sift_db_connect_total", "outcome" => "success").increment(1);
}

pub fn track_connect_failure(stage: &'static str) {
    counter!("sift_db_connect_total", "outcome" => "failure", "stage" => stage).increment(1);
}

pub fn track_reconnect() {
    counter!("sift_db_reconnect_total").increment(1);
}

pub fn record_pool_stats(stats: &ConnectionStats) {
    gauge!("sift_db_pool_max_open_connections").set(f64::from(stats.max_open_connections));
    gauge!("sift_db_pool_open_connections").set(f64::from(stats.open_connections));
    gauge!("sift_db_pool_in_use_connections").set(f64::from(stats.in_use));
    gauge!("sift_db_pool_idle_connections").set(f64::from(stats.idle));
}
