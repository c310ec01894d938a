use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        pattern(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b");
    static ref PHONE_REGEX: Regex =
        pattern(r"(?:\+\d{1,2}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b");
    // Patient-identifying string fields in echoed JSON bodies
    static ref IDENTITY_FIELD_REGEX: Regex =
        pattern(r#""(name|gender)"\s*:\s*"(?:[^"\\]|\\.)*""#);
}

// Only ever called with the literal patterns above
#[allow(clippy::unwrap_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap()
}

/// What the redactor rewrites
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_identity_fields: bool,
    /// Replace emails and phones with a short hash instead of a mask
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_identity_fields: true,
            hash_for_correlation: true,
        }
    }
}

impl RedactionConfig {
    /// A configuration that leaves text untouched.
    pub fn disabled() -> Self {
        Self {
            redact_emails: false,
            redact_phones: false,
            redact_identity_fields: false,
            hash_for_correlation: false,
        }
    }
}

/// Rewrites diagnostic text so patient data never reaches the log sink.
///
/// Backend error bodies are logged verbatim by the request gateway, and the
/// clinic services like to echo the offending record back, so a failed
/// `POST /patients` can easily carry a name in its message.
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_identity_fields {
            result = IDENTITY_FIELD_REGEX
                .replace_all(&result, |caps: &Captures| {
                    format!("\"{}\":\"[REDACTED]\"", &caps[1])
                })
                .into_owned();
        }

        if self.config.redact_emails {
            result = EMAIL_REGEX
                .replace_all(&result, |caps: &Captures| self.mask("EMAIL", &caps[0], "***@***"))
                .into_owned();
        }

        if self.config.redact_phones {
            result = PHONE_REGEX
                .replace_all(&result, |caps: &Captures| self.mask("PHONE", &caps[0], "***-***-****"))
                .into_owned();
        }

        result
    }

    fn mask(&self, label: &str, value: &str, fallback: &str) -> String {
        if self.config.hash_for_correlation {
            format!("{}[{}]", label, hash_value(value))
        } else {
            fallback.to_string()
        }
    }
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    general_purpose::STANDARD_NO_PAD.encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_identity_fields_in_echoed_body() {
        let redacted = masking_redactor()
            .redact(r#"Invalid patient {"name":"Jane Roe","age":41,"gender":"F"}"#);
        assert_eq!(
            redacted,
            r#"Invalid patient {"name":"[REDACTED]","age":41,"gender":"[REDACTED]"}"#
        );
    }

    #[test]
    fn test_email_and_phone_masking() {
        let redacted = masking_redactor().redact("Contact jane.roe@example.com or 555-123-4567");
        assert_eq!(redacted, "Contact ***@*** or ***-***-****");
    }

    #[test]
    fn test_hash_is_stable_for_correlation() {
        let redactor = PiiRedactor::default();
        let first = redactor.redact("mail jane@example.com");
        let second = redactor.redact("again jane@example.com");
        let tag = first.trim_start_matches("mail ");
        assert!(tag.starts_with("EMAIL["));
        assert!(second.ends_with(tag));
    }

    #[test]
    fn test_disabled_config_is_passthrough() {
        let redactor = PiiRedactor::new(RedactionConfig::disabled());
        let text = r#"{"name":"Dr. A"} jane@example.com"#;
        assert_eq!(redactor.redact(text), text);
    }

    #[test]
    fn test_status_codes_are_not_phone_numbers() {
        let redactor = masking_redactor();
        assert_eq!(redactor.redact("HTTP error, status 500"), "HTTP error, status 500");
    }
}
