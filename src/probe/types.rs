use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Fixed growth of the batch size between rounds.
pub(crate) const BATCH_INCREMENT: u64 = 5;

/// Courtesy pause between batches; lets transient load settle.
pub(crate) const INTER_BATCH_DELAY: Duration = Duration::from_millis(500);

/// A post-baseline batch whose mean latency exceeds baseline times this
/// multiplier is classified as throttling.
pub(crate) const LATENCY_THRESHOLD_MULTIPLIER: u64 = 3;

pub(crate) const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Result of one request attempt. Created once by the executor, immutable
/// thereafter, appended to the run's metric log in send order.
#[derive(Debug, Clone)]
pub struct RequestMetric {
    pub req_id: u64,
    /// HTTP status code, or 0 when the attempt failed before a status was
    /// obtained (timeout, connection error, protocol error).
    pub status: u16,
    /// Wall-clock duration of the attempt, recorded even on failure.
    pub latency_us: u64,
    pub size_bytes: u64,
    /// Diagnostic, present only when `status == 0`.
    pub error: Option<String>,
}

impl RequestMetric {
    /// A metric where a response was actually obtained.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.status != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Inconclusive,
    HardRateLimitingDetected,
    SoftRateLimitingBlockingDetected,
    SoftRateLimitingThrottlingDetected,
    NoRateLimitDetected,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Verdict::Inconclusive => "INCONCLUSIVE",
            Verdict::HardRateLimitingDetected => "HARD RATE LIMITING DETECTED",
            Verdict::SoftRateLimitingBlockingDetected => "SOFT RATE LIMITING (BLOCKING) DETECTED",
            Verdict::SoftRateLimitingThrottlingDetected => {
                "SOFT RATE LIMITING (THROTTLING) DETECTED"
            }
            Verdict::NoRateLimitDetected => "NO RATE LIMIT DETECTED",
        };
        f.write_str(label)
    }
}

/// Inputs the scheduler consumes; everything else about the run policy
/// (increment, delay, thresholds) is fixed.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    pub max_requests: u64,
    pub start_batch_size: u64,
}

/// Run-wide mutable record. Owned by the scheduler for the lifetime of one
/// probe run; the analyzer mutates it through explicit transitions only.
#[derive(Debug)]
pub struct RunState {
    pub total_requests_sent: u64,
    /// Append-only, send order by `req_id`.
    pub metrics: Vec<RequestMetric>,
    pub baseline_latency_us: u64,
    pub baseline_status: u16,
    pub is_baseline_set: bool,
    /// Starts INCONCLUSIVE; set at most once to a terminal value, and only
    /// together with a limiting-related stop reason.
    pub verdict: Verdict,
    /// Once set, no further batches are sent.
    pub stop_reason: Option<String>,
}

impl RunState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_requests_sent: 0,
            metrics: Vec::new(),
            baseline_latency_us: 0,
            baseline_status: 0,
            is_baseline_set: false,
            verdict: Verdict::Inconclusive,
            stop_reason: None,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean latency over the given metrics; 0 for an empty set.
pub(crate) fn mean_latency_us<'a, I>(metrics: I) -> u64
where
    I: IntoIterator<Item = &'a RequestMetric>,
{
    let mut sum: u128 = 0;
    let mut count: u128 = 0;
    for metric in metrics {
        sum = sum.saturating_add(u128::from(metric.latency_us));
        count = count.saturating_add(1);
    }
    let mean = sum.checked_div(count).unwrap_or(0);
    u64::try_from(mean).map_or(u64::MAX, |value| value)
}

/// Most frequent status code. Ties break deterministically to the lowest
/// status code, so concurrent completion order never changes the outcome.
pub(crate) fn modal_status<'a, I>(metrics: I) -> u16
where
    I: IntoIterator<Item = &'a RequestMetric>,
{
    let mut counts: BTreeMap<u16, u64> = BTreeMap::new();
    for metric in metrics {
        let slot = counts.entry(metric.status).or_insert(0);
        *slot = slot.saturating_add(1);
    }

    let mut best_status = 0u16;
    let mut best_count = 0u64;
    for (status, count) in counts {
        if count > best_count {
            best_status = status;
            best_count = count;
        }
    }
    best_status
}

/// Renders integer microseconds as milliseconds with two decimals.
#[must_use]
pub fn format_latency_ms(latency_us: u64) -> String {
    let ms_x100 = latency_us / 10;
    format!("{}.{:02}", ms_x100 / 100, ms_x100 % 100)
}
