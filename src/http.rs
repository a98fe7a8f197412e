//! HTTP client construction and single-attempt request execution.
mod executor;

pub use executor::{ProbeTransport, ReqwestTransport, build_client};
