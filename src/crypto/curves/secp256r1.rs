//! Secp256r1 (P-256/NIST) Curve Implementation
//!
//! Used by: NEO, ONT, hardware-backed keys
//!
//! Features:
//! - ECDSA signing of a 32-byte prehashed digest, low-S normalized
//! - Recoverable signatures with the parity adjusted for normalization
//! - SLIP-0010 key derivation (`Nist256p1 seed`)

use ecdsa::RecoveryId;
use hmac::{Hmac, Mac};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::{Field, PrimeField};
use p256::{EncodedPoint, FieldBytes, Scalar};
use zeroize::Zeroizing;

use super::{digest_array, private_key_array, CurveError, EllipticCurve, KeyDerivation, RecoverableSignature, SigningStrategy};
use crate::wallet::derivation_path::DerivationPath;

type HmacSha512 = Hmac<sha2::Sha512>;

/// Secp256r1 (P-256) curve implementation
pub struct Secp256r1Curve;

impl Secp256r1Curve {
    fn signing_key(private_key: &[u8]) -> Result<SigningKey, CurveError> {
        let bytes = private_key_array(private_key)?;
        SigningKey::from_bytes(&bytes.into())
            .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid signing key: {:?}", e)))
    }

    /// Parse public key from compressed or uncompressed SEC1 encoding
    fn parse_public_key(public_key: &[u8]) -> Result<VerifyingKey, CurveError> {
        match public_key.len() {
            33 | 65 => {
                let point = EncodedPoint::from_bytes(public_key)
                    .map_err(|e| CurveError::InvalidPublicKey(format!("Invalid point: {:?}", e)))?;

                VerifyingKey::from_encoded_point(&point)
                    .map_err(|e| CurveError::InvalidPublicKey(format!("Invalid key: {:?}", e)))
            }
            _ => Err(CurveError::InvalidPublicKey(
                format!("Public key must be 33 or 65 bytes, got {}", public_key.len())
            )),
        }
    }

    fn compressed(verifying_key: &VerifyingKey) -> Result<[u8; 33], CurveError> {
        let point = verifying_key.to_encoded_point(true);
        <[u8; 33]>::try_from(point.as_bytes())
            .map_err(|_| CurveError::InvalidPublicKey("Unexpected compressed point length".into()))
    }

    /// Flip a signature to low-S form, adjusting the recovery parity with it
    fn normalize(signature: Signature, recovery_id: Option<RecoveryId>) -> (Signature, Option<RecoveryId>) {
        match signature.normalize_s() {
            Some(normalized) => {
                let flipped = recovery_id.map(|id| RecoveryId::new(!id.is_y_odd(), id.is_x_reduced()));
                (normalized, flipped)
            }
            None => (signature, recovery_id),
        }
    }

    /// Interpret 32 bytes as a scalar strictly below the group order
    fn scalar_from_bytes(bytes: &[u8]) -> Option<Scalar> {
        let field_bytes = FieldBytes::clone_from_slice(bytes);
        Option::from(Scalar::from_repr(field_bytes))
    }
}

impl EllipticCurve for Secp256r1Curve {
    type PublicKey = [u8; 33]; // Compressed public key
    type Signature = [u8; 64]; // Fixed-size signature

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let signing_key = Self::signing_key(private_key)?;
        Self::compressed(signing_key.verifying_key())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let signing_key = Self::signing_key(private_key)?;
        let digest = digest_array(digest)?;

        let signature: Signature = signing_key
            .sign_prehash(&digest)
            .map_err(|e| CurveError::SigningFailed(e.to_string()))?;
        let (signature, _) = Self::normalize(signature, None);

        Ok(signature.to_bytes().into())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(
                format!("Signature must be 64 bytes, got {}", signature.len())
            ));
        }

        let verifying_key = Self::parse_public_key(public_key)?;
        let digest = digest_array(digest)?;
        let sig = Signature::from_slice(signature)
            .map_err(|e| CurveError::InvalidSignature(format!("Invalid signature: {:?}", e)))?;

        Ok(verifying_key.verify_prehash(&digest, &sig).is_ok())
    }
}

impl RecoverableSignature for Secp256r1Curve {
    fn sign_recoverable(private_key: &[u8], digest: &[u8]) -> Result<(Self::Signature, u8), CurveError> {
        let signing_key = Self::signing_key(private_key)?;
        let digest = digest_array(digest)?;

        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| CurveError::SigningFailed(e.to_string()))?;
        let (signature, recovery_id) = Self::normalize(signature, Some(recovery_id));
        let recovery_id = recovery_id
            .ok_or_else(|| CurveError::SigningFailed("Missing recovery id".into()))?;

        Ok((signature.to_bytes().into(), recovery_id.to_byte()))
    }

    fn recover_public_key(digest: &[u8], signature: &[u8], recovery_id: u8) -> Result<Self::PublicKey, CurveError> {
        let digest = digest_array(digest)?;
        let sig = Signature::from_slice(signature)
            .map_err(|e| CurveError::InvalidSignature(format!("Invalid signature: {:?}", e)))?;
        let rec_id = RecoveryId::from_byte(recovery_id)
            .ok_or_else(|| CurveError::InvalidSignature(format!("Invalid recovery ID: {}", recovery_id)))?;

        let verifying_key = VerifyingKey::recover_from_prehash(&digest, &sig, rec_id)
            .map_err(|e| CurveError::VerificationFailed(format!("Recovery failed: {}", e)))?;

        Self::compressed(&verifying_key)
    }
}

impl KeyDerivation for Secp256r1Curve {
    fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<Zeroizing<Vec<u8>>, CurveError> {
        let mut mac = HmacSha512::new_from_slice(b"Nist256p1 seed")
            .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
        mac.update(seed);
        let mut result = mac.finalize().into_bytes();

        // SLIP-0010: an out-of-range master key is rehashed from I
        while Self::scalar_from_bytes(&result[..32]).map_or(true, |s| bool::from(s.is_zero())) {
            let mut mac = HmacSha512::new_from_slice(b"Nist256p1 seed")
                .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
            mac.update(&result);
            result = mac.finalize().into_bytes();
        }

        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&result[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&result[32..]);

        for component in &path.components {
            let index = component.full_index();
            let parent = Self::scalar_from_bytes(key.as_slice())
                .ok_or_else(|| CurveError::DerivationFailed("Parent key out of range".into()))?;

            let mut data = Zeroizing::new(Vec::with_capacity(37));
            if component.hardened {
                data.push(0x00);
                data.extend_from_slice(key.as_slice());
            } else {
                data.extend_from_slice(&Self::public_key_from_private(key.as_slice())?);
            }
            data.extend_from_slice(&index.to_be_bytes());

            loop {
                let mut mac = HmacSha512::new_from_slice(&chain_code)
                    .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
                mac.update(&data);
                let i = mac.finalize().into_bytes();
                let (il, ir) = i.split_at(32);

                let child = Self::scalar_from_bytes(il)
                    .map(|tweak| tweak + parent)
                    .filter(|child| !bool::from(child.is_zero()));

                match child {
                    Some(child) => {
                        key.copy_from_slice(&child.to_repr());
                        chain_code.copy_from_slice(ir);
                        break;
                    }
                    None => {
                        // SLIP-0010 retry: I = HMAC(c, 0x01 || IR || index)
                        data.clear();
                        data.push(0x01);
                        data.extend_from_slice(ir);
                        data.extend_from_slice(&index.to_be_bytes());
                    }
                }
            }
        }

        Ok(Zeroizing::new(key.to_vec()))
    }
}

impl SigningStrategy for Secp256r1Curve {
    const BASE_SIGNATURE_LEN: usize = 64;

    fn sign_obligation(private_key: &[u8], digest: &[u8], append_recovery: bool) -> Result<Vec<u8>, CurveError> {
        if !append_recovery {
            return Ok(Self::sign(private_key, digest)?.to_vec());
        }

        let (sig, recovery_id) = Self::sign_recoverable(private_key, digest)?;
        let mut encoded = Vec::with_capacity(Self::BASE_SIGNATURE_LEN + 1);
        encoded.extend_from_slice(&sig);
        encoded.push(recovery_id);
        Ok(encoded)
    }
}

// MARK: - Tests
