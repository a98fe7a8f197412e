//! Final report rendering. Pure presentation over a finished run.
use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::{AppError, AppResult};
use crate::probe::{ProbeSettings, RunState, Verdict, format_latency_ms, mean_latency_us};

#[derive(Serialize)]
struct ReportPayload<'a> {
    total_requests_sent: u64,
    baseline_latency_ms: String,
    avg_latency_ms: String,
    verdict: Verdict,
    stop_reason: Option<&'a str>,
}

/// Renders the final report to stdout.
///
/// # Errors
///
/// Returns an error when the JSON payload cannot be serialized.
pub fn render(state: &RunState, settings: &ProbeSettings, format: OutputFormat) -> AppResult<()> {
    let avg_latency_us = mean_latency_us(state.metrics.iter().filter(|m| m.is_valid()));

    match format {
        OutputFormat::Json => {
            let payload = ReportPayload {
                total_requests_sent: state.total_requests_sent,
                baseline_latency_ms: format_latency_ms(state.baseline_latency_us),
                avg_latency_ms: format_latency_ms(avg_latency_us),
                verdict: state.verdict,
                stop_reason: state.stop_reason.as_deref(),
            };
            let rendered = serde_json::to_string_pretty(&payload)
                .map_err(|source| AppError::ReportSerialize { source })?;
            println!("{}", rendered);
        }
        OutputFormat::Text => print_text_report(state, settings, avg_latency_us),
    }

    Ok(())
}

fn print_text_report(state: &RunState, settings: &ProbeSettings, avg_latency_us: u64) {
    let rule = "=".repeat(60);
    let thin_rule = "-".repeat(60);

    println!();
    println!("{}", rule);
    println!("FINAL TEST REPORT");
    println!("{}", rule);
    println!("Total Requests Sent : {}", state.total_requests_sent);
    println!(
        "Baseline Latency    : {}ms",
        format_latency_ms(state.baseline_latency_us)
    );
    if state.metrics.iter().any(|m| m.is_valid()) {
        println!("Average Latency     : {}ms", format_latency_ms(avg_latency_us));
    }
    println!("{}", thin_rule);
    println!("VERDICT: {}", state.verdict);
    if let Some(reason) = state.stop_reason.as_deref() {
        println!("Reason : {}", reason);
    }
    println!("{}", rule);

    println!();
    println!("LIMITATIONS OF FINDINGS:");
    println!("1. Results apply only to the specific source IP used.");
    println!(
        "2. Testing stopped at {} requests; limits may exist at higher thresholds.",
        settings.max_requests
    );
    println!("3. Time window was short; long-term sliding window limits may not be triggered.");
    println!("4. Network jitter can occasionally mimic throttling.");
}
