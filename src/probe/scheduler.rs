use futures_util::future::join_all;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::http::ProbeTransport;

use super::analyzer::analyze_batch;
use super::types::{BATCH_INCREMENT, INTER_BATCH_DELAY, ProbeSettings, RunState, Verdict};

/// Drives the full probe run: sequential batches of concurrently dispatched
/// requests, each batch joined in full before analysis, the next batch five
/// requests larger, never exceeding the safety cap.
///
/// `req_id`s are assigned sequentially at dispatch, and `join_all` preserves
/// input order, so the metric log stays in send order regardless of
/// completion order.
pub async fn run_probe<T>(transport: &T, settings: &ProbeSettings) -> RunState
where
    T: ProbeTransport + Sync,
{
    let mut state = RunState::new();
    let mut current_batch_size = settings.start_batch_size;

    while state.total_requests_sent < settings.max_requests {
        let remaining = settings.max_requests.saturating_sub(state.total_requests_sent);
        let count = current_batch_size.min(remaining);
        if count == 0 {
            break;
        }

        info!(count, "dispatching batch");

        let mut attempts = Vec::new();
        for _ in 0..count {
            state.total_requests_sent = state.total_requests_sent.saturating_add(1);
            attempts.push(transport.execute(state.total_requests_sent));
        }
        let batch = join_all(attempts).await;

        let should_stop = analyze_batch(&batch, &mut state);
        state.metrics.extend(batch);

        if should_stop {
            if let Some(reason) = state.stop_reason.as_deref() {
                warn!(reason, "stopping");
            }
            break;
        }

        current_batch_size = current_batch_size.saturating_add(BATCH_INCREMENT);
        sleep(INTER_BATCH_DELAY).await;
    }

    if state.stop_reason.is_none() && state.total_requests_sent >= settings.max_requests {
        state.verdict = Verdict::NoRateLimitDetected;
        state.stop_reason = Some("Reached maximum request limit with stable behavior".to_owned());
    }

    state
}
