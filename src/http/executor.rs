use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Method, Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use tokio::time::Instant;

use crate::error::HttpError;
use crate::probe::RequestMetric;

/// Seam between the batch scheduler and the network. One call = one request
/// attempt = one `RequestMetric`; implementations never retry and never let
/// a transport failure escape as an error.
#[async_trait]
pub trait ProbeTransport {
    async fn execute(&self, req_id: u64) -> RequestMetric;
}

/// Builds the HTTP client used for the whole run. The per-request timeout is
/// enforced by the transport; a timeout is indistinguishable from any other
/// transport failure downstream.
///
/// # Errors
///
/// Returns an error when the underlying client cannot be constructed.
pub fn build_client(request_timeout: Duration) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(request_timeout)
        .build()
        .map_err(|source| HttpError::BuildClientFailed { source })
}

pub struct ReqwestTransport {
    client: Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
}

impl ReqwestTransport {
    /// Prepares the request template shared by every attempt in the run.
    ///
    /// # Errors
    ///
    /// Returns an error when a header name or value cannot be encoded.
    pub fn new(
        client: Client,
        method: Method,
        url: Url,
        headers: &BTreeMap<String, String>,
    ) -> Result<Self, HttpError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|source| {
                    HttpError::InvalidHeaderName {
                        name: name.clone(),
                        source,
                    }
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|source| HttpError::InvalidHeaderValue {
                    name: name.clone(),
                    source,
                })?;
            header_map.insert(header_name, header_value);
        }

        Ok(Self {
            client,
            method,
            url,
            headers: header_map,
        })
    }
}

#[async_trait]
impl ProbeTransport for ReqwestTransport {
    async fn execute(&self, req_id: u64) -> RequestMetric {
        let start = Instant::now();
        let outcome = self
            .client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone())
            .send()
            .await;

        match outcome {
            Ok(response) => {
                let status = response.status().as_u16();
                // Latency covers the full body transfer, not just headers.
                match response.bytes().await {
                    Ok(body) => RequestMetric {
                        req_id,
                        status,
                        latency_us: elapsed_us(start),
                        size_bytes: u64::try_from(body.len()).map_or(u64::MAX, |len| len),
                        error: None,
                    },
                    Err(err) => failure_metric(req_id, elapsed_us(start), &err),
                }
            }
            Err(err) => failure_metric(req_id, elapsed_us(start), &err),
        }
    }
}

fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).map_or(u64::MAX, |value| value)
}

fn failure_metric(req_id: u64, latency_us: u64, err: &reqwest::Error) -> RequestMetric {
    RequestMetric {
        req_id,
        status: 0,
        latency_us,
        size_bytes: 0,
        error: Some(err.to_string()),
    }
}
