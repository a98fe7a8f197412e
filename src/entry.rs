use std::collections::BTreeMap;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use url::Url;

use crate::args::{ProbeArgs, build_header_map};
use crate::error::{AppResult, ValidationError};
use crate::http::{ReqwestTransport, build_client};
use crate::probe::{ProbeSettings, run_probe};
use crate::report;

/// Parses the CLI, validates the target, and drives one probe run.
///
/// # Errors
///
/// Returns an error when the URL is invalid, the HTTP client cannot be
/// built, or the runtime fails to start. Validation failures happen before
/// any request is sent.
pub fn run() -> AppResult<()> {
    let args = ProbeArgs::parse();

    crate::logger::init_logging(args.verbose, args.no_color);

    let url = validate_url(&args.url)?;
    let headers = build_header_map(&args.headers);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, url, headers))
}

async fn run_async(
    args: ProbeArgs,
    url: Url,
    headers: BTreeMap<String, String>,
) -> AppResult<()> {
    info!(
        target = %url,
        method = ?args.method,
        cap = args.max_requests,
        "starting adaptive rate-limit test"
    );

    // One client for the whole run; dropped with the transport on every
    // exit path.
    let client = build_client(Duration::from_millis(args.request_timeout_ms))?;
    let transport = ReqwestTransport::new(client, args.method.into(), url, &headers)?;

    let settings = ProbeSettings {
        max_requests: args.max_requests,
        start_batch_size: args.batch_size,
    };
    let state = run_probe(&transport, &settings).await;

    report::render(&state, &settings, args.output)
}

fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    let parsed = Url::parse(raw).map_err(|source| ValidationError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })?;
    if !parsed.has_host() {
        return Err(ValidationError::UrlMissingSchemeOrHost {
            url: raw.to_owned(),
        });
    }
    Ok(parsed)
}
