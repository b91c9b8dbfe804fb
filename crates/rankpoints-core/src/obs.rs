//! Structured observability hooks for calculations and comparison passes.
//!
//! Every emission carries an `event` field naming what happened, so log
//! pipelines can filter on it regardless of output format. Verbosity follows
//! `RUST_LOG`; see [`crate::telemetry::init_tracing`].

use tracing::{debug, info, warn};

use crate::calculator::CalculationMode;

/// Emit event: a single-value calculation finished.
pub fn emit_calculation_completed(event_name: &str, mode: CalculationMode) {
    info!(event = "calc.completed", event_name = %event_name, mode = ?mode);
}

/// Emit event: a comparison pass started.
pub fn emit_pass_started(generation: u64) {
    debug!(event = "pass.started", generation = generation);
}

/// Emit event: a comparison pass published its matrix.
pub fn emit_pass_committed(generation: u64) {
    info!(event = "pass.committed", generation = generation);
}

/// Emit event: a pass resolved after a newer one started; its result was dropped.
pub fn emit_pass_superseded(generation: u64, current: u64) {
    info!(
        event = "pass.superseded",
        generation = generation,
        current = current,
    );
}

/// Emit event: one matrix cell fell back to the sentinel (warning level).
pub fn emit_cell_degraded(event_name: &str, points: i32, error: &dyn std::fmt::Display) {
    warn!(
        event = "cell.degraded",
        event_name = %event_name,
        points = points,
        error = %error,
    );
}
