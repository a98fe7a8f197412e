//! Adaptive batch-probing core: run state, baseline analyzer, batch scheduler.
mod analyzer;
mod scheduler;
mod types;


pub(crate) use analyzer::analyze_batch;
pub(crate) use types::mean_latency_us;
pub use scheduler::run_probe;
pub use types::{ProbeSettings, RequestMetric, RunState, Verdict, format_latency_ms};
