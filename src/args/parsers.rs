use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ValidationError;

use super::defaults::DEFAULT_USER_AGENT;

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        Some(_) | None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

pub(super) fn parse_positive_u64(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|err| format!("Invalid number '{}': {}", s, err))?;
    if value == 0 {
        return Err("Value must be at least 1.".to_owned());
    }
    Ok(value)
}

/// Builds the request header map from raw `Key: Value` CLI entries.
///
/// Malformed entries are dropped with a warning; the run continues. A default
/// `User-Agent` is injected when the operator did not supply one.
#[must_use]
pub fn build_header_map(raw_headers: &[String]) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    for entry in raw_headers {
        match parse_header(entry) {
            Ok((key, value)) => {
                headers.insert(key, value);
            }
            Err(err) => warn!("{} Ignored.", err),
        }
    }

    let has_user_agent = headers
        .keys()
        .any(|key| key.eq_ignore_ascii_case("user-agent"));
    if !has_user_agent {
        headers.insert("User-Agent".to_owned(), DEFAULT_USER_AGENT.to_owned());
    }

    headers
}
