//! Common error handling utilities for the Clinic Console
//!
//! Every failure the console can observe, whether a refused connection, a
//! non-2xx answer from the clinic backend or a form field that does not
//! parse, is folded into a single [`ConsoleError`]. The request gateway and
//! the view controllers only ever deal with this type, which keeps the
//! "notify, log, re-raise" contract uniform across the workspace.
//!
//! # Error Categories
//!
//! - **Http**: the backend answered with a non-success status
//! - **Network**: the request never produced a response
//! - **Decode**: a success response carried JSON we could not read
//! - **Validation**: client-side form validation, never sent over the wire
//! - **Config**: configuration and client construction problems
//!
//! # Example
//!
//! ```rust
//! use error_common::{ConsoleError, Result};
//!
//! fn parse_age(raw: &str) -> Result<i32> {
//!     raw.trim()
//!         .parse()
//!         .map_err(|_| ConsoleError::Validation("Age must be a whole number".to_string()))
//! }
//!
//! let err = parse_age("forty").unwrap_err();
//! assert_eq!(err.user_message(), "Age must be a whole number");
//! ```

pub mod types;

pub use types::*;
