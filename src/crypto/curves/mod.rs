//! Multi-Curve Cryptography Support
//!
//! This module provides a unified abstraction for the signature schemes the
//! custody service can ask for on a signing obligation:
//!
//! - `secp256k1`: Bitcoin, Ethereum and most account/UTXO chains
//! - `secp256r1` (P-256/NIST): NEO, ONT and hardware-backed keys
//! - `ed25519`: EOS-family and Cardano-style chains
//! - `bls12-381` (augmented scheme): Chia, signed with a synthetic secret key
//!
//! # Architecture
//!
//! Every curve is a zero-sized type implementing:
//! - `EllipticCurve`: public key derivation, digest signing, verification
//! - `KeyDerivation`: hierarchical child key derivation from a seed
//! - `SigningStrategy`: the obligation-level rule (recovery byte, encoding)
//!
//! `CurveType` is the closed set of identifiers found on the wire. Adding a
//! curve means adding a variant, and every `match` below stops compiling
//! until the new variant is handled.
//!
//! # Example
//!
//! ```rust,ignore
//! use openw_signer::crypto::curves::{CurveType, public_key_from_private, verify};
//!
//! let curve = CurveType::from_ecc_type(0xECC0_0000).unwrap();
//! let pubkey = public_key_from_private(curve, &private_key)?;
//! let valid = verify(curve, &pubkey, &digest, &signature)?;
//! ```

pub mod secp256k1;
pub mod secp256r1;
pub mod ed25519;
pub mod bls12381;
pub mod traits;

pub use traits::*;
pub use self::secp256k1::Secp256k1Curve;
pub use secp256r1::Secp256r1Curve;
pub use ed25519::Ed25519Curve;
pub use bls12381::Bls12381Curve;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Wire identifiers (`eccType`) used by the custody service
pub mod ecc_types {
    pub const SECP256K1: u32 = 0xECC0_0000;
    pub const SECP256R1: u32 = 0xECC0_0001;
    pub const ED25519: u32 = 0xECC0_0004;
    pub const BLS12381_G2_XMD_SHA256_SWU_RO_AUG: u32 = 0xECC0_0009;
}

// MARK: - Curve Type Enum

/// Supported elliptic curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// secp256k1 - Bitcoin, Ethereum, Tron, etc.
    Secp256k1,
    /// secp256r1 (P-256/NIST) - NEO, ONT
    Secp256r1,
    /// Ed25519 - EOS-family, Cardano-style chains
    Ed25519,
    /// BLS12-381 augmented scheme (min-pk) - Chia
    Bls12381G2Aug,
}

impl CurveType {
    /// All supported curves, in wire-identifier order
    pub const ALL: [CurveType; 4] = [
        Self::Secp256k1,
        Self::Secp256r1,
        Self::Ed25519,
        Self::Bls12381G2Aug,
    ];

    /// Resolve a wire `eccType` value
    pub fn from_ecc_type(ecc_type: u32) -> Option<Self> {
        match ecc_type {
            ecc_types::SECP256K1 => Some(Self::Secp256k1),
            ecc_types::SECP256R1 => Some(Self::Secp256r1),
            ecc_types::ED25519 => Some(Self::Ed25519),
            ecc_types::BLS12381_G2_XMD_SHA256_SWU_RO_AUG => Some(Self::Bls12381G2Aug),
            _ => None,
        }
    }

    /// The wire `eccType` value for this curve
    pub fn ecc_type(&self) -> u32 {
        match self {
            Self::Secp256k1 => ecc_types::SECP256K1,
            Self::Secp256r1 => ecc_types::SECP256R1,
            Self::Ed25519 => ecc_types::ED25519,
            Self::Bls12381G2Aug => ecc_types::BLS12381_G2_XMD_SHA256_SWU_RO_AUG,
        }
    }

    /// Get the curve name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "secp256r1",
            Self::Ed25519 => "ed25519",
            Self::Bls12381G2Aug => "bls12381g2aug",
        }
    }

    /// Get the public key size in bytes (compressed for applicable curves)
    pub fn public_key_size(&self) -> usize {
        match self {
            Self::Secp256k1 => 33,
            Self::Secp256r1 => 33,
            Self::Ed25519 => 32,
            Self::Bls12381G2Aug => 48,
        }
    }

    /// Get the signature size in bytes, without any recovery byte
    pub fn signature_size(&self) -> usize {
        match self {
            Self::Secp256k1 => Secp256k1Curve::BASE_SIGNATURE_LEN,
            Self::Secp256r1 => Secp256r1Curve::BASE_SIGNATURE_LEN,
            Self::Ed25519 => Ed25519Curve::BASE_SIGNATURE_LEN,
            Self::Bls12381G2Aug => Bls12381Curve::BASE_SIGNATURE_LEN,
        }
    }

    /// Whether a recovery byte can be appended to this curve's signatures
    pub fn supports_recovery(&self) -> bool {
        matches!(self, Self::Secp256k1 | Self::Secp256r1)
    }

    /// Expected encoded signature length for an obligation
    pub fn encoded_signature_size(&self, append_recovery: bool) -> usize {
        if append_recovery && self.supports_recovery() {
            self.signature_size() + 1
        } else {
            self.signature_size()
        }
    }
}

impl FromStr for CurveType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "secp256r1" | "p256" | "nist256p1" => Ok(Self::Secp256r1),
            "ed25519" => Ok(Self::Ed25519),
            "bls12381g2aug" | "bls12381" | "bls" => Ok(Self::Bls12381G2Aug),
            other => Err(CurveError::UnsupportedCurve(other.to_string())),
        }
    }
}

impl std::fmt::Display for CurveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// MARK: - Curve Errors

/// Errors that can occur during curve operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveError {
    InvalidPrivateKey(String),
    InvalidPublicKey(String),
    InvalidSignature(String),
    InvalidDigest(String),
    SigningFailed(String),
    VerificationFailed(String),
    UnsupportedCurve(String),
    DerivationFailed(String),
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPrivateKey(s) => write!(f, "Invalid private key: {}", s),
            Self::InvalidPublicKey(s) => write!(f, "Invalid public key: {}", s),
            Self::InvalidSignature(s) => write!(f, "Invalid signature: {}", s),
            Self::InvalidDigest(s) => write!(f, "Invalid digest: {}", s),
            Self::SigningFailed(s) => write!(f, "Signing failed: {}", s),
            Self::VerificationFailed(s) => write!(f, "Verification failed: {}", s),
            Self::UnsupportedCurve(s) => write!(f, "Unsupported curve: {}", s),
            Self::DerivationFailed(s) => write!(f, "Key derivation failed: {}", s),
        }
    }
}

impl std::error::Error for CurveError {}

/// Require an exact 32-byte private key
pub(crate) fn private_key_array(private_key: &[u8]) -> Result<[u8; 32], CurveError> {
    <[u8; 32]>::try_from(private_key).map_err(|_| {
        CurveError::InvalidPrivateKey(format!(
            "Private key must be 32 bytes, got {}",
            private_key.len()
        ))
    })
}

/// Require an exact 32-byte prehashed digest (ECDSA curves)
pub(crate) fn digest_array(digest: &[u8]) -> Result<[u8; 32], CurveError> {
    <[u8; 32]>::try_from(digest).map_err(|_| {
        CurveError::InvalidDigest(format!("Digest must be 32 bytes, got {}", digest.len()))
    })
}

// MARK: - Unified Interface

/// Derive the public key a verifier checks obligations against.
///
/// For BLS this is the public key of the synthetic secret key, not of the
/// raw child key.
pub fn public_key_from_private(curve: CurveType, private_key: &[u8]) -> Result<Vec<u8>, CurveError> {
    match curve {
        CurveType::Secp256k1 => Ok(Secp256k1Curve::public_key_from_private(private_key)?.to_vec()),
        CurveType::Secp256r1 => Ok(Secp256r1Curve::public_key_from_private(private_key)?.to_vec()),
        CurveType::Ed25519 => Ok(Ed25519Curve::public_key_from_private(private_key)?.to_vec()),
        CurveType::Bls12381G2Aug => Ok(crate::crypto::synthetic::synthetic_public_key(private_key)?.to_vec()),
    }
}

/// Verify an obligation signature (base signature, no recovery byte)
pub fn verify(curve: CurveType, public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
    match curve {
        CurveType::Secp256k1 => Secp256k1Curve::verify(public_key, digest, signature),
        CurveType::Secp256r1 => Secp256r1Curve::verify(public_key, digest, signature),
        CurveType::Ed25519 => Ed25519Curve::verify(public_key, digest, signature),
        CurveType::Bls12381G2Aug => Bls12381Curve::verify(public_key, digest, signature),
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_type_properties() {
        assert_eq!(CurveType::Secp256k1.name(), "secp256k1");
        assert_eq!(CurveType::Bls12381G2Aug.public_key_size(), 48);
        assert_eq!(CurveType::Bls12381G2Aug.signature_size(), 96);
        assert_eq!(CurveType::Ed25519.signature_size(), 64);

        assert!(CurveType::Secp256k1.supports_recovery());
        assert!(!CurveType::Ed25519.supports_recovery());
        assert_eq!(CurveType::Secp256r1.encoded_signature_size(true), 65);
        assert_eq!(CurveType::Bls12381G2Aug.encoded_signature_size(true), 96);
    }

    #[test]
    fn test_ecc_type_round_trip() {
        for curve in CurveType::ALL {
            assert_eq!(CurveType::from_ecc_type(curve.ecc_type()), Some(curve));
        }
        assert_eq!(CurveType::from_ecc_type(0xECC0_0002), None);
        assert_eq!(CurveType::from_ecc_type(0), None);
    }

    #[test]
    fn test_curve_type_from_str() {
        assert_eq!("secp256k1".parse::<CurveType>(), Ok(CurveType::Secp256k1));
        assert_eq!("Ed25519".parse::<CurveType>(), Ok(CurveType::Ed25519));
        assert_eq!("P256".parse::<CurveType>(), Ok(CurveType::Secp256r1));
        assert_eq!("bls".parse::<CurveType>(), Ok(CurveType::Bls12381G2Aug));
        assert!("sm2".parse::<CurveType>().is_err());
    }

    #[test]
    fn test_unified_sign_verify_each_curve() {
        let private_key = [7u8; 32];
        let digest = [0x5Au8; 32];

        for curve in CurveType::ALL {
            let signature = match curve {
                CurveType::Secp256k1 => Secp256k1Curve::sign_obligation(&private_key, &digest, false),
                CurveType::Secp256r1 => Secp256r1Curve::sign_obligation(&private_key, &digest, false),
                CurveType::Ed25519 => Ed25519Curve::sign_obligation(&private_key, &digest, false),
                CurveType::Bls12381G2Aug => Bls12381Curve::sign_obligation(&private_key, &digest, false),
            }
            .unwrap();

            let public_key = public_key_from_private(curve, &private_key).unwrap();
            assert_eq!(public_key.len(), curve.public_key_size());
            assert!(verify(curve, &public_key, &digest, &signature).unwrap(), "{curve}");
        }
    }
}
