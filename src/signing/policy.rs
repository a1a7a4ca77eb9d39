//! Signature Policy
//!
//! Picks the signing algorithm and post-processing rule for an obligation
//! from its curve identifier:
//! - BLS12-381 (augmented): sign with the synthetic secret key, never a recovery byte
//! - secp256k1 / secp256r1: low-S ECDSA, `r || s` plus `v` when requested
//! - Ed25519: plain EdDSA; a requested recovery byte is an error

use crate::crypto::curves::{
    Bls12381Curve, CurveError, CurveType, Ed25519Curve, Secp256k1Curve, Secp256r1Curve,
    SigningStrategy,
};
use crate::error::{SignerError, SignerResult};

/// Sign `digest` with `private_key` under `curve`.
///
/// The output length is fixed for a given (curve, append_recovery) pair, see
/// [`CurveType::encoded_signature_size`].
pub fn sign(
    private_key: &[u8],
    digest: &[u8],
    curve: CurveType,
    append_recovery: bool,
) -> Result<Vec<u8>, CurveError> {
    let signature = match curve {
        CurveType::Secp256k1 => Secp256k1Curve::sign_obligation(private_key, digest, append_recovery)?,
        CurveType::Secp256r1 => Secp256r1Curve::sign_obligation(private_key, digest, append_recovery)?,
        CurveType::Ed25519 => Ed25519Curve::sign_obligation(private_key, digest, append_recovery)?,
        CurveType::Bls12381G2Aug => Bls12381Curve::sign_obligation(private_key, digest, append_recovery)?,
    };

    let expected = curve.encoded_signature_size(append_recovery);
    if signature.len() != expected {
        return Err(CurveError::SigningFailed(format!(
            "{} produced {} signature bytes, expected {}",
            curve,
            signature.len(),
            expected
        )));
    }

    Ok(signature)
}

/// Resolve a wire `eccType`
pub fn curve_for_ecc_type(ecc_type: u32) -> SignerResult<CurveType> {
    CurveType::from_ecc_type(ecc_type)
        .ok_or_else(|| SignerError::unsupported_curve(format!("Unknown eccType {:#010x}", ecc_type)))
}

/// Decode an obligation's hex message digest
pub fn decode_digest(message: &str) -> SignerResult<Vec<u8>> {
    if message.is_empty() {
        return Err(SignerError::digest_decode("Message digest is empty"));
    }
    hex::decode(message)
        .map_err(|e| SignerError::digest_decode(format!("Message digest is not valid hex: {}", e)))
}

/// `sign` keyed by wire identifier, with errors in the crate taxonomy
pub fn sign_with_ecc_type(
    private_key: &[u8],
    digest: &[u8],
    ecc_type: u32,
    append_recovery: bool,
) -> SignerResult<Vec<u8>> {
    let curve = curve_for_ecc_type(ecc_type)?;
    sign(private_key, digest, curve, append_recovery).map_err(|e| match e {
        // zero or out-of-range scalars
        CurveError::InvalidPrivateKey(msg) => SignerError::signing_failure(format!("Invalid private key: {}", msg)),
        other => SignerError::from(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curves::{ecc_types, public_key_from_private, verify};
    use crate::error::ErrorCode;

    const KEY: [u8; 32] = [0x11; 32];
    const DIGEST: [u8; 32] = [0x22; 32];

    #[test]
    fn test_signature_lengths() {
        for curve in CurveType::ALL {
            let plain = sign(&KEY, &DIGEST, curve, false).unwrap();
            assert_eq!(plain.len(), curve.signature_size(), "{curve}");

            if curve != CurveType::Ed25519 {
                let with_v = sign(&KEY, &DIGEST, curve, true).unwrap();
                assert_eq!(with_v.len(), curve.encoded_signature_size(true), "{curve}");
            }
        }
        assert_eq!(sign(&KEY, &DIGEST, CurveType::Secp256k1, true).unwrap().len(), 65);
        assert_eq!(sign(&KEY, &DIGEST, CurveType::Bls12381G2Aug, true).unwrap().len(), 96);
    }

    #[test]
    fn test_deterministic() {
        for curve in CurveType::ALL {
            assert_eq!(
                sign(&KEY, &DIGEST, curve, false).unwrap(),
                sign(&KEY, &DIGEST, curve, false).unwrap()
            );
        }
    }

    #[test]
    fn test_verifies_against_own_key_only() {
        let other = [0x12u8; 32];
        let mut wrong_digest = DIGEST;
        wrong_digest[0] ^= 1;

        for curve in CurveType::ALL {
            let sig = sign(&KEY, &DIGEST, curve, false).unwrap();
            let pk = public_key_from_private(curve, &KEY).unwrap();
            let other_pk = public_key_from_private(curve, &other).unwrap();

            assert!(verify(curve, &pk, &DIGEST, &sig).unwrap());
            assert!(!verify(curve, &pk, &wrong_digest, &sig).unwrap());
            assert!(!verify(curve, &other_pk, &DIGEST, &sig).unwrap());
        }
    }

    #[test]
    fn test_ed25519_recovery_rejected() {
        let err = sign_with_ecc_type(&KEY, &DIGEST, ecc_types::ED25519, true).unwrap_err();
        assert_eq!(err.code, ErrorCode::SigningFailure);
    }

    #[test]
    fn test_unknown_ecc_type() {
        let err = sign_with_ecc_type(&KEY, &DIGEST, 0xECC0_0002, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedCurve);
    }

    #[test]
    fn test_zero_scalar_is_signing_failure() {
        for ecc_type in [ecc_types::SECP256K1, ecc_types::SECP256R1, ecc_types::BLS12381_G2_XMD_SHA256_SWU_RO_AUG] {
            let err = sign_with_ecc_type(&[0u8; 32], &DIGEST, ecc_type, false).unwrap_err();
            assert_eq!(err.code, ErrorCode::SigningFailure);
        }
    }

    #[test]
    fn test_ecdsa_needs_32_byte_digest() {
        let err = sign_with_ecc_type(&KEY, &[1, 2, 3], ecc_types::SECP256K1, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::SigningFailure);
    }

    #[test]
    fn test_decode_digest() {
        assert_eq!(decode_digest("0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_digest("").unwrap_err().code, ErrorCode::DigestDecodeError);
        assert_eq!(decode_digest("zz").unwrap_err().code, ErrorCode::DigestDecodeError);
        assert_eq!(decode_digest("abc").unwrap_err().code, ErrorCode::DigestDecodeError);
    }
}
