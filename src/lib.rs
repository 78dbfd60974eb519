pub mod config;
pub mod models;
pub mod pipeline;

pub use models::{Domain, DomainRecord, Level};
pub use pipeline::extraction::{
    parse, parse_bytes, parse_bytes_with_policy, parse_tagged, parse_with_policy, ExtractionError,
    ParsePolicy, RawResponse,
};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the default
/// filter. Calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
