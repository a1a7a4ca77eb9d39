//! Unified error types for the signing engine
//!
//! Every failure surfaced by the public entry points flows through
//! [`SignerError`] so that callers (and the FFI layer) get a stable code
//! alongside a human-readable message.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::curves::CurveError;
use crate::wallet::keystore::KeyStoreError;

/// Main error type for all signing operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl SignerError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn unsupported_curve(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedCurve, msg)
    }

    pub fn digest_decode(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DigestDecodeError, msg)
    }

    pub fn signing_failure(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SigningFailure, msg)
    }

    pub fn incomplete_key_set(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::IncompleteKeySet, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SignerError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Obligation errors
    InvalidDerivationPath,
    UnsupportedCurve,
    DigestDecodeError,
    SigningFailure,
    IncompleteKeySet,

    // Key material errors
    DerivationError,
    InvalidPrivateKey,

    // Input errors
    InvalidInput,
    JsonError,

    // Internal
    Internal,
}

/// Result type alias for signing operations
pub type SignerResult<T> = Result<T, SignerError>;

// Conversions from common error types

impl From<serde_json::Error> for SignerError {
    fn from(e: serde_json::Error) -> Self {
        SignerError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for SignerError {
    fn from(e: hex::FromHexError) -> Self {
        SignerError::new(ErrorCode::DigestDecodeError, e.to_string())
    }
}

impl From<CurveError> for SignerError {
    fn from(e: CurveError) -> Self {
        let code = match e {
            CurveError::InvalidPrivateKey(_) => ErrorCode::InvalidPrivateKey,
            CurveError::UnsupportedCurve(_) => ErrorCode::UnsupportedCurve,
            CurveError::DerivationFailed(_) => ErrorCode::DerivationError,
            CurveError::InvalidPublicKey(_)
            | CurveError::InvalidSignature(_)
            | CurveError::InvalidDigest(_)
            | CurveError::SigningFailed(_)
            | CurveError::VerificationFailed(_) => ErrorCode::SigningFailure,
        };
        SignerError::new(code, e.to_string())
    }
}

impl From<KeyStoreError> for SignerError {
    fn from(e: KeyStoreError) -> Self {
        let code = match e {
            KeyStoreError::InvalidPath(_) => ErrorCode::InvalidDerivationPath,
            KeyStoreError::UnsupportedCurve(_) => ErrorCode::UnsupportedCurve,
            KeyStoreError::InvalidSeed(_) => ErrorCode::InvalidInput,
            KeyStoreError::Derivation(_) | KeyStoreError::Timeout(_) => ErrorCode::DerivationError,
        };
        SignerError::new(code, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = SignerError::incomplete_key_set("No obligations for account")
            .with_details("account=acct-1");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("incomplete_key_set"));
        assert!(json.contains("No obligations for account"));
    }

    #[test]
    fn test_error_display_includes_details() {
        let err = SignerError::digest_decode("bad hex").with_details("input=2");
        assert_eq!(err.to_string(), "[DigestDecodeError] bad hex (input=2)");
    }

    #[test]
    fn test_hex_error_maps_to_digest_decode() {
        let err: SignerError = hex::decode("zz").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::DigestDecodeError);
    }

    #[test]
    fn test_curve_error_mapping() {
        let err: SignerError = CurveError::SigningFailed("zero scalar".into()).into();
        assert_eq!(err.code, ErrorCode::SigningFailure);

        let err: SignerError = CurveError::UnsupportedCurve("0x1".into()).into();
        assert_eq!(err.code, ErrorCode::UnsupportedCurve);
    }

    #[test]
    fn test_keystore_error_mapping() {
        let err: SignerError = KeyStoreError::InvalidPath("m/x".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidDerivationPath);

        let err: SignerError = KeyStoreError::Timeout("hsm".into()).into();
        assert_eq!(err.code, ErrorCode::DerivationError);
    }
}
