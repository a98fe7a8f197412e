use tracing::{info, warn};

use super::types::{
    LATENCY_THRESHOLD_MULTIPLIER, RequestMetric, RunState, STATUS_TOO_MANY_REQUESTS, Verdict,
    format_latency_ms, mean_latency_us, modal_status,
};

/// Decision core. Evaluates one completed batch against the run state and
/// returns `true` when testing must stop.
///
/// The first batch containing at least one valid metric establishes the
/// baseline and is never evaluated against it. Post-baseline rules apply in
/// strict priority order; the first match wins:
/// a 429 anywhere in the batch, then a shift of the modal status code, then
/// a mean latency beyond the baseline threshold.
pub(crate) fn analyze_batch(batch: &[RequestMetric], state: &mut RunState) -> bool {
    let valid: Vec<&RequestMetric> = batch.iter().filter(|metric| metric.is_valid()).collect();

    if valid.is_empty() {
        // Connection collapse is itself evidence of limiting, but it is
        // reported as an inconclusive safety stop, not a confirmed verdict.
        warn!("batch failed entirely (connection errors); stopping");
        state.stop_reason = Some("Connection Instability".to_owned());
        return true;
    }

    let avg_latency_us = mean_latency_us(valid.iter().copied());

    if !state.is_baseline_set {
        state.baseline_latency_us = avg_latency_us;
        state.baseline_status = modal_status(valid.iter().copied());
        state.is_baseline_set = true;
        info!(
            baseline_latency_ms = %format_latency_ms(state.baseline_latency_us),
            baseline_status = state.baseline_status,
            "baseline established"
        );
        return false;
    }

    if valid
        .iter()
        .any(|metric| metric.status == STATUS_TOO_MANY_REQUESTS)
    {
        state.verdict = Verdict::HardRateLimitingDetected;
        state.stop_reason = Some("HTTP 429 Response Observed".to_owned());
        return true;
    }

    let current_mode = modal_status(valid.iter().copied());
    if current_mode != state.baseline_status {
        state.verdict = Verdict::SoftRateLimitingBlockingDetected;
        state.stop_reason = Some(format!(
            "Status code shifted from {} to {}",
            state.baseline_status, current_mode
        ));
        return true;
    }

    if avg_latency_us > state.baseline_latency_us.saturating_mul(LATENCY_THRESHOLD_MULTIPLIER) {
        state.verdict = Verdict::SoftRateLimitingThrottlingDetected;
        state.stop_reason = Some(format!(
            "Latency spiked to {}ms (Baseline: {}ms)",
            format_latency_ms(avg_latency_us),
            format_latency_ms(state.baseline_latency_us)
        ));
        return true;
    }

    false
}
