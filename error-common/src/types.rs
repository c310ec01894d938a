use thiserror::Error;

/// Message shown to the user when a failure carries no text of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Error enum shared by every console crate
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Non-success HTTP status; `message` is the response body verbatim
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Network communication errors (refused, reset, timed out)
    #[error("{0}")]
    Network(String),

    /// A success response whose body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Client-side validation errors
    #[error("{0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConsoleError {
    /// Build an HTTP failure from a status code and the raw response body.
    ///
    /// An empty (or whitespace-only) body is replaced by a generic
    /// `HTTP error, status <code>` message.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() {
            format!("HTTP error, status {}", status)
        } else {
            body
        };
        ConsoleError::Http { status, message }
    }

    /// The text surfaced in a notification for this error.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation(_))
    }

    /// Short category name used as a structured logging field.
    pub fn error_type(&self) -> &'static str {
        match self {
            ConsoleError::Http { .. } => "http",
            ConsoleError::Network(_) => "network",
            ConsoleError::Decode(_) => "decode",
            ConsoleError::Validation(_) => "validation",
            ConsoleError::Config(_) => "config",
            ConsoleError::Other(_) => "other",
        }
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Emit a structured diagnostic event for an error
pub fn log_error(context: &str, error: &ConsoleError) {
    tracing::error!(
        context = context,
        error_type = error.error_type(),
        status = error.status(),
        error = %error,
        "Console error occurred"
    );
}
