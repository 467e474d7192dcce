//! Prometheus metrics for pulse-api.
//!
//! Exposes reaction-ledger collectors and an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Toggles applied successfully, labeled by reaction kind.
    pub static ref REACTION_TOGGLES: IntCounterVec = register_int_counter_vec!(
        "pulse_reaction_toggles_total",
        "Reaction toggles applied successfully",
        &["kind"]
    )
    .expect("pulse_reaction_toggles_total registration");

    /// Toggle transactions re-run after a storage conflict.
    pub static ref REACTION_CONFLICT_RETRIES: IntCounter = register_int_counter!(
        "pulse_reaction_conflict_retries_total",
        "Toggle transactions re-run after a storage conflict"
    )
    .expect("pulse_reaction_conflict_retries_total registration");

    /// Toggles that exhausted their retry budget and surfaced an error.
    pub static ref REACTION_CONFLICT_FAILURES: IntCounter = register_int_counter!(
        "pulse_reaction_conflict_failures_total",
        "Toggles that exhausted the conflict retry budget"
    )
    .expect("pulse_reaction_conflict_failures_total registration");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
