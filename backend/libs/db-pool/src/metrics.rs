//! Prometheus gauges describing pool capacity and utilization.

use lazy_static::lazy_static;
use prometheus::{register_int_gauge_vec, IntGaugeVec};
use sqlx::PgPool;

lazy_static! {
    static ref POOL_MAX_CONNECTIONS: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_max_connections",
        "Configured maximum connections per service pool",
        &["service"]
    )
    .expect("db_pool_max_connections metric registration");
    static ref POOL_SIZE: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_size",
        "Current number of connections held by the pool",
        &["service"]
    )
    .expect("db_pool_size metric registration");
    static ref POOL_IDLE: IntGaugeVec = register_int_gauge_vec!(
        "db_pool_idle_connections",
        "Current number of idle connections in the pool",
        &["service"]
    )
    .expect("db_pool_idle_connections metric registration");
}

/// Record the configured ceiling for a service pool. Called once at startup.
pub fn set_pool_capacity(service_name: &str, max_connections: u32) {
    POOL_MAX_CONNECTIONS
        .with_label_values(&[service_name])
        .set(i64::from(max_connections));
}

/// Refresh live pool gauges for the given service.
///
/// Called after pool creation; services may also call this periodically if
/// they want live utilization numbers on their `/metrics` endpoint.
pub fn update_pool_metrics(service_name: &str, pool: &PgPool) {
    POOL_SIZE
        .with_label_values(&[service_name])
        .set(i64::from(pool.size()));
    POOL_IDLE
        .with_label_values(&[service_name])
        .set(pool.num_idle() as i64);
}
