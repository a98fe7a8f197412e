pub const DEFAULT_USER_AGENT: &str = concat!(
    "rlprobe/",
    env!("CARGO_PKG_VERSION"),
    " (Security Research)"
);

/// Safety cap on total requests per run.
pub const DEFAULT_MAX_REQUESTS: u64 = 100;

/// Size of the first batch; later batches grow by a fixed increment.
pub const DEFAULT_START_BATCH_SIZE: u64 = 5;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
