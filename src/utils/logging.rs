//! Log Redaction
//!
//! Signing events go through `tracing`. Values attached to those events are
//! rendered by a [`Redactor`] first: addresses keep their first 6 and last
//! 4 chars, digests and signatures their first 10 and last 6. Key material
//! is never attached to an event.

use crate::config::SignerConfig;

/// Renders log field values according to the signer's redaction setting
#[derive(Debug, Clone, Copy)]
pub struct Redactor {
    enabled: bool,
}

impl Redactor {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &SignerConfig) -> Self {
        Self::new(config.redact_logs)
    }

    pub fn address(&self, address: &str) -> String {
        if self.enabled {
            redact_address(address)
        } else {
            address.to_string()
        }
    }

    /// Digests and signatures
    pub fn hash(&self, hash: &str) -> String {
        if self.enabled {
            redact_hash(hash)
        } else {
            hash.to_string()
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Fully redact a sensitive value
pub fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }

    let len = value.len();
    if len <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", len)
    }
}

/// Partially redact an address (show first 6 and last 4 chars)
pub fn redact_address(address: &str) -> String {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    let prefix_len = if trimmed.starts_with("0x") { 8 } else { 6 };
    let suffix_len = 4;

    if !trimmed.is_ascii() || trimmed.len() <= prefix_len + suffix_len + 3 {
        return redact_value(trimmed);
    }

    let prefix = &trimmed[..prefix_len];
    let suffix = &trimmed[trimmed.len() - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Partially redact a hash (show first 10 and last 6 chars)
pub fn redact_hash(hash: &str) -> String {
    let trimmed = hash.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    if trimmed.len() <= 20 {
        return trimmed.to_string(); // Short hashes shown fully
    }

    if !trimmed.is_ascii() {
        return redact_value(trimmed);
    }

    let prefix_len = if trimmed.starts_with("0x") { 12 } else { 10 };
    let suffix_len = 6;

    let prefix = &trimmed[..prefix_len];
    let suffix = &trimmed[trimmed.len() - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Install a `tracing` subscriber for the binary.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to this crate.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("openw_signer={}", default_level)))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("openw_signer=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value(""), "[EMPTY]");
        assert_eq!(redact_value("abc"), "[REDACTED]");
        assert_eq!(redact_value("secret_key_12345"), "[REDACTED:16chars]");
    }

    #[test]
    fn test_redact_address() {
        let addr = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
        let redacted = redact_address(addr);
        assert!(redacted.starts_with("0xd8dA6B"));
        assert!(redacted.ends_with("6045"));
        assert!(redacted.contains("..."));

        let qtum = "QbgHTXtqwkpQcNkFVSLMqcmyPvXDZtwAqD";
        let redacted = redact_address(qtum);
        assert_eq!(redacted, "QbgHTX...wAqD");
    }

    #[test]
    fn test_redact_hash() {
        let digest = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
        let redacted = redact_hash(digest);
        assert_eq!(redacted, "1234567890...abcdef");
        assert_eq!(redact_hash("abcd"), "abcd");
    }

    #[test]
    fn test_redactor_disabled_shows_values() {
        let redactor = Redactor::new(false);
        let addr = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
        assert_eq!(redactor.address(addr), addr);
        assert_eq!(redactor.hash(&"ab".repeat(32)), "ab".repeat(32));
    }

    #[test]
    fn test_redactor_from_config() {
        let redactor = Redactor::from_config(&SignerConfig::default());
        assert_eq!(redactor.hash(&"ab".repeat(32)), format!("{}...{}", "ab".repeat(5), "ab".repeat(3)));
        assert_eq!(redactor.address(""), "[EMPTY]");

        let redactor = Redactor::from_config(&SignerConfig::default().with_redact_logs(false));
        assert_eq!(redactor.address("QbgHTXtqwkpQcNkFVSLMqcmyPvXDZtwAqD"), "QbgHTXtqwkpQcNkFVSLMqcmyPvXDZtwAqD");
    }
}
