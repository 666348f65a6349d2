//! Quarry Core Library
//!
//! Request shaping and result decoration for a document search engine's
//! `_search` API. [`SearchParameters`] accumulates the options of a search
//! and projects them into the request shape an executor sends to the engine;
//! [`Explanation`] gives a typed, lazily traversed view over the score
//! explanation trees the engine returns.
//!
//! Performing the request and decoding the response are left to the caller.

pub mod config;
pub mod error;
pub mod search;

// Re-export commonly used types
pub use crate::config::{LoggingConfig, QuarryConfig, SearchDefaults};
pub use error::{ErrorCategory, QuarryError, Result};
pub use search::{
    Clause, Explanation, Placement, SearchParameters, SortField, SourceFilter, TrackTotalHits,
};

/// Initialize logging with JSON formatting
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarry_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(|e| QuarryError::validation(format!("Logging already initialized: {}", e)))
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::new(level);

    let registry = tracing_subscriber::registry().with(env_filter);

    let initialized = match format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "text" | "pretty" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
        _ => {
            return Err(QuarryError::validation(format!(
                "Unknown log format: {}",
                format
            )));
        }
    };

    initialized
        .map_err(|e| QuarryError::validation(format!("Logging already initialized: {}", e)))
}

/// Initialize logging from the logging section of the configuration
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    init_logging_with_config(&config.level, &config.format)
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
