//! Tracing setup with automatic PHI/PII redaction
//!
//! The console logs every failed backend call for diagnostics. Those
//! messages are the raw error bodies returned by the clinic services and
//! regularly contain patient names, e-mail addresses or phone numbers, so
//! they are routed through a [`PiiRedactor`] before they reach the sink.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init, redacted_error, LoggerConfig};
//!
//! init(&LoggerConfig::default().with_level("debug")).expect("logger");
//!
//! // Output: Request failed: {"name":"[REDACTED]","age":41}
//! redacted_error!("Request failed: {}", r#"{"name":"Jane Roe","age":41}"#);
//! ```

pub mod config;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use redactor::*;

pub use tracing;

use std::sync::atomic::{AtomicBool, Ordering};

use lazy_static::lazy_static;
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static REDACTION_ENABLED: AtomicBool = AtomicBool::new(true);

lazy_static! {
    static ref REDACTOR: PiiRedactor = PiiRedactor::default();
}

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Output always goes
/// to stderr so terminal tables on stdout stay readable.
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|_| LoggerError::AlreadyInitialized)?;
    REDACTION_ENABLED.store(config.redaction_enabled, Ordering::Relaxed);
    Ok(())
}

/// Redact `text` with the process-wide redactor.
///
/// Redaction is on until [`init`] installs a config that turns it off.
pub fn redact(text: &str) -> String {
    if REDACTION_ENABLED.load(Ordering::Relaxed) {
        REDACTOR.redact(text)
    } else {
        text.to_string()
    }
}
