//! Signer Configuration
//!
//! Settings are passed explicitly to [`crate::signing::BatchSigner`]; there is
//! no process-wide mutable state. Presets:
//! - `default()`: quiet, sequential, redacted logs
//! - `debug()`: per-obligation logging, still redacted

use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};

/// Environment variable enabling per-obligation debug logs
pub const ENV_VERBOSE: &str = "OPENW_SIGNER_VERBOSE";
/// Environment variable enabling parallel signing
pub const ENV_PARALLEL: &str = "OPENW_SIGNER_PARALLEL";

/// Batch signing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Emit a debug event for every obligation signed
    pub verbose: bool,
    /// Sign independent obligations on a rayon pool
    pub parallel: bool,
    /// Partially redact addresses, digests and signatures in log events
    pub redact_logs: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            parallel: false,
            redact_logs: true,
        }
    }
}

impl SignerConfig {
    pub fn debug() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_redact_logs(mut self, redact_logs: bool) -> Self {
        self.redact_logs = redact_logs;
        self
    }

    pub fn from_json(json: &str) -> SignerResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SignerError::invalid_input(format!("Invalid signer config: {}", e)))
    }

    /// Defaults overridden by `OPENW_SIGNER_VERBOSE` / `OPENW_SIGNER_PARALLEL`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(verbose) = lookup(ENV_VERBOSE).and_then(|v| parse_flag(&v)) {
            config.verbose = verbose;
        }
        if let Some(parallel) = lookup(ENV_PARALLEL).and_then(|v| parse_flag(&v)) {
            config.parallel = parallel;
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
