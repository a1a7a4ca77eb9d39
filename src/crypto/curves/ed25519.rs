//! Ed25519 Curve Implementation
//!
//! Used by: EOS-family and Cardano-style chains
//!
//! Features:
//! - EdDSA signing and verification (RFC 8032); the digest is signed as the message
//! - SLIP-0010 key derivation (hardened only)

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use hmac::{Hmac, Mac};
use zeroize::Zeroizing;

use super::{private_key_array, CurveError, EllipticCurve, KeyDerivation, SigningStrategy};
use crate::wallet::derivation_path::{DerivationPath, HARDENED};

type HmacSha512 = Hmac<sha2::Sha512>;

/// Ed25519 curve implementation
pub struct Ed25519Curve;

impl EllipticCurve for Ed25519Curve {
    type PublicKey = [u8; 32];
    type Signature = [u8; 64];

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let sk_bytes = Zeroizing::new(private_key_array(private_key)?);
        let signing_key = SigningKey::from_bytes(&sk_bytes);
        Ok(signing_key.verifying_key().to_bytes())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        if digest.is_empty() {
            return Err(CurveError::InvalidDigest("Digest must not be empty".into()));
        }

        let sk_bytes = Zeroizing::new(private_key_array(private_key)?);
        let signing_key = SigningKey::from_bytes(&sk_bytes);

        Ok(signing_key.sign(digest).to_bytes())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        let pk_bytes = <[u8; 32]>::try_from(public_key).map_err(|_| {
            CurveError::InvalidPublicKey(format!("Public key must be 32 bytes, got {}", public_key.len()))
        })?;
        let sig_bytes = <[u8; 64]>::try_from(signature).map_err(|_| {
            CurveError::InvalidSignature(format!("Signature must be 64 bytes, got {}", signature.len()))
        })?;

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;
        let sig = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(digest, &sig).is_ok())
    }
}

impl KeyDerivation for Ed25519Curve {
    fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<Zeroizing<Vec<u8>>, CurveError> {
        // Derive master key from seed using SLIP-0010
        let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
            .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
        mac.update(seed);
        let result = mac.finalize().into_bytes();

        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&result[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&result[32..]);

        // Ed25519 always uses hardened derivation
        for component in &path.components {
            let index = component.index | HARDENED;

            let mut mac = HmacSha512::new_from_slice(&chain_code)
                .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
            mac.update(&[0x00]);
            mac.update(key.as_slice());
            mac.update(&index.to_be_bytes());
            let result = mac.finalize().into_bytes();

            key.copy_from_slice(&result[..32]);
            chain_code.copy_from_slice(&result[32..]);
        }

        Ok(Zeroizing::new(key.to_vec()))
    }
}

impl SigningStrategy for Ed25519Curve {
    const BASE_SIGNATURE_LEN: usize = 64;

    fn sign_obligation(private_key: &[u8], digest: &[u8], append_recovery: bool) -> Result<Vec<u8>, CurveError> {
        if append_recovery {
            return Err(CurveError::SigningFailed(
                "ed25519 signatures carry no recovery byte".into()
            ));
        }
        Ok(Self::sign(private_key, digest)?.to_vec())
    }
}

// MARK: - Tests
