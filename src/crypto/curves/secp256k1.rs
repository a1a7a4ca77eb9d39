//! secp256k1 Curve Implementation
//!
//! Used by: Bitcoin, Ethereum, Tron and most secp256k1 chains.
//!
//! Features:
//! - ECDSA signing of a 32-byte prehashed digest, low-S normalized
//! - Recoverable signatures (r || s || v) for chains that authenticate by recovery
//! - BIP-32 key derivation

use bitcoin::bip32::{ChildNumber, DerivationPath as Bip32Path, Xpriv};
use bitcoin::NetworkKind;
use secp256k1::ecdsa::{RecoverableSignature as RecovSig, RecoveryId, Signature};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use super::{digest_array, private_key_array, CurveError, EllipticCurve, KeyDerivation, RecoverableSignature, SigningStrategy};
use crate::wallet::derivation_path::DerivationPath;

/// secp256k1 curve implementation
pub struct Secp256k1Curve;

impl Secp256k1Curve {
    fn secret_key(private_key: &[u8]) -> Result<SecretKey, CurveError> {
        let bytes = private_key_array(private_key)?;
        SecretKey::from_slice(&bytes).map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))
    }

    fn message(digest: &[u8]) -> Result<Message, CurveError> {
        Ok(Message::from_digest(digest_array(digest)?))
    }
}

impl EllipticCurve for Secp256k1Curve {
    type PublicKey = [u8; 33]; // Compressed
    type Signature = [u8; 64]; // r,s

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let secp = Secp256k1::signing_only();
        let sk = Self::secret_key(private_key)?;
        Ok(PublicKey::from_secret_key(&secp, &sk).serialize())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let secp = Secp256k1::signing_only();
        let sk = Self::secret_key(private_key)?;
        let msg = Self::message(digest)?;

        let mut sig = secp.sign_ecdsa(&msg, &sk);
        sig.normalize_s();

        Ok(sig.serialize_compact())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(
                format!("Signature must be 64 bytes, got {}", signature.len())
            ));
        }

        let secp = Secp256k1::verification_only();
        let pk = PublicKey::from_slice(public_key)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;
        let sig = Signature::from_compact(signature)
            .map_err(|e| CurveError::InvalidSignature(e.to_string()))?;
        let msg = Self::message(digest)?;

        Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
    }
}

impl RecoverableSignature for Secp256k1Curve {
    fn sign_recoverable(private_key: &[u8], digest: &[u8]) -> Result<(Self::Signature, u8), CurveError> {
        let secp = Secp256k1::signing_only();
        let sk = Self::secret_key(private_key)?;
        let msg = Self::message(digest)?;

        // libsecp256k1 only emits low-S signatures, so the recovery id needs no flip.
        let sig = secp.sign_ecdsa_recoverable(&msg, &sk);
        let (recovery_id, serialized) = sig.serialize_compact();

        Ok((serialized, recovery_id.to_i32() as u8))
    }

    fn recover_public_key(digest: &[u8], signature: &[u8], recovery_id: u8) -> Result<Self::PublicKey, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(
                format!("Signature must be 64 bytes, got {}", signature.len())
            ));
        }

        let secp = Secp256k1::verification_only();
        let rec_id = RecoveryId::from_i32(recovery_id as i32)
            .map_err(|e| CurveError::InvalidSignature(format!("Invalid recovery ID: {}", e)))?;
        let sig = RecovSig::from_compact(signature, rec_id)
            .map_err(|e| CurveError::InvalidSignature(e.to_string()))?;
        let msg = Self::message(digest)?;

        let pk = secp.recover_ecdsa(&msg, &sig)
            .map_err(|e| CurveError::VerificationFailed(format!("Recovery failed: {}", e)))?;

        Ok(pk.serialize())
    }
}

impl KeyDerivation for Secp256k1Curve {
    fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<Zeroizing<Vec<u8>>, CurveError> {
        let secp = Secp256k1::new();
        let master = Xpriv::new_master(NetworkKind::Main, seed)
            .map_err(|e| CurveError::DerivationFailed(format!("BIP32 master key: {}", e)))?;

        let children = path
            .components
            .iter()
            .map(|c| {
                if c.hardened {
                    ChildNumber::from_hardened_idx(c.index)
                } else {
                    ChildNumber::from_normal_idx(c.index)
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CurveError::DerivationFailed(format!("Invalid child number: {}", e)))?;

        let child = master
            .derive_priv(&secp, &Bip32Path::from(children))
            .map_err(|e| CurveError::DerivationFailed(format!("BIP32 derivation: {}", e)))?;

        Ok(Zeroizing::new(child.private_key.secret_bytes().to_vec()))
    }
}

impl SigningStrategy for Secp256k1Curve {
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
