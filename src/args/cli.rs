use clap::Parser;

use super::defaults::{
    DEFAULT_MAX_REQUESTS, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_START_BATCH_SIZE,
};
use super::parsers::parse_positive_u64;
use super::types::{HttpMethod, OutputFormat};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Adaptive rate-limit probe: sends growing batches of concurrent requests against a single endpoint and classifies hard vs soft rate limiting under a strict request cap."
)]
pub struct ProbeArgs {
    /// Target URL (must include scheme and host, e.g. https://api.example.com/login)
    pub url: String,

    /// HTTP method to use
    #[arg(long, short = 'm', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable); malformed entries are dropped with a warning
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Safety cap on total requests sent; never exceeded regardless of findings
    #[arg(long = "max", default_value_t = DEFAULT_MAX_REQUESTS, value_parser = parse_positive_u64)]
    pub max_requests: u64,

    /// Size of the first batch
    #[arg(long = "batch-size", default_value_t = DEFAULT_START_BATCH_SIZE, value_parser = parse_positive_u64)]
    pub batch_size: u64,

    /// Per-request timeout in milliseconds
    #[arg(long = "request-timeout-ms", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS, value_parser = parse_positive_u64)]
    pub request_timeout_ms: u64,

    /// Report format
    #[arg(long, default_value = "text", ignore_case = true)]
    pub output: OutputFormat,

    /// Verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
