//! CLI argument surface and header handling.
mod cli;
mod defaults;
mod parsers;
mod types;


pub use cli::ProbeArgs;
pub use defaults::{
    DEFAULT_MAX_REQUESTS, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_START_BATCH_SIZE, DEFAULT_USER_AGENT,
};
pub use parsers::build_header_map;
pub use types::{HttpMethod, OutputFormat};
