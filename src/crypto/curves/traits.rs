//! Elliptic Curve Traits
//!
//! Defines the common interface for all elliptic curve implementations.

use zeroize::Zeroizing;

use super::CurveError;
use crate::wallet::derivation_path::DerivationPath;

/// Core trait for elliptic curve operations
pub trait EllipticCurve {
    /// The public key type
    type PublicKey: AsRef<[u8]>;
    /// The signature type
    type Signature: AsRef<[u8]>;

    /// Derive the public key from a private key
    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError>;

    /// Sign a prepared digest with a private key
    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError>;

    /// Verify a signature over a prepared digest
    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError>;
}

/// Extended trait for curves that support recoverable signatures
pub trait RecoverableSignature: EllipticCurve {
    /// Sign with recovery ID (r || s, v)
    fn sign_recoverable(private_key: &[u8], digest: &[u8]) -> Result<(Self::Signature, u8), CurveError>;

    /// Recover public key from signature and digest
    fn recover_public_key(digest: &[u8], signature: &[u8], recovery_id: u8) -> Result<Self::PublicKey, CurveError>;
}

/// Extended trait for curves that support hierarchical key derivation
pub trait KeyDerivation: EllipticCurve {
    /// Derive the child private key at `path` from a master seed
    fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<Zeroizing<Vec<u8>>, CurveError>;
}

/// How a curve turns a derived key and a digest into the bytes stored on an
/// obligation.
pub trait SigningStrategy: EllipticCurve {
    /// Signature length before any recovery byte
    const BASE_SIGNATURE_LEN: usize;

    /// Sign `digest`, appending the recovery byte when requested and
    /// meaningful for the scheme.
    fn sign_obligation(private_key: &[u8], digest: &[u8], append_recovery: bool) -> Result<Vec<u8>, CurveError>;
}
