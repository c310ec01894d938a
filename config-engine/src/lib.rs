//! Configuration loading for the Clinic Console
//!
//! Settings are layered, later sources winning:
//!
//! - **Defaults**: compiled into [`ConsoleConfig`]
//! - **File**: an explicit path, or `clinic-console.{yaml,toml,json}` in the
//!   platform config directory when none is given
//! - **Environment**: `CLINIC_` prefixed variables, e.g. `CLINIC_API_BASE_URL`
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigEngine;
//!
//! let config = ConfigEngine::new().load()?;
//! println!("Gateway: {}", config.api_base_url);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```
//!
//! ```yaml
//! api_base_url: "http://clinic.internal:8080"
//! request_timeout_secs: 15
//! notification_duration_ms: 3000
//! log_level: "debug"
//! ```

pub mod engine;
pub mod error;

pub use engine::*;
pub use error::*;
