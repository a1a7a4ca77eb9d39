//! BLS12-381 Curve Implementation (augmented scheme)
//!
//! Used by: Chia
//!
//! Minimal-pubkey-size variant: 48-byte G1 public keys and 96-byte G2
//! signatures. The augmented scheme prepends the signer's public key to the
//! message before hashing to G2, which is what the chain's verifier expects.
//!
//! Obligations are never signed with the raw child key: `sign_obligation`
//! first converts it to the synthetic secret key (see `crypto::synthetic`).

use blst::min_pk::{PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use zeroize::Zeroizing;

use super::{private_key_array, CurveError, EllipticCurve, KeyDerivation, SigningStrategy};
use crate::crypto::synthetic::synthetic_secret_key;
use crate::wallet::derivation_path::DerivationPath;

/// Domain separation tag of the augmented scheme
pub const AUG_SCHEME_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_AUG_";

/// BLS12-381 curve implementation
pub struct Bls12381Curve;

impl Bls12381Curve {
    pub(crate) fn secret_key(private_key: &[u8]) -> Result<SecretKey, CurveError> {
        let bytes = Zeroizing::new(private_key_array(private_key)?);
        SecretKey::from_bytes(bytes.as_slice())
            .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid BLS scalar: {:?}", e)))
    }
}

impl EllipticCurve for Bls12381Curve {
    type PublicKey = [u8; 48];
    type Signature = [u8; 96];

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        Ok(Self::secret_key(private_key)?.sk_to_pk().compress())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let sk = Self::secret_key(private_key)?;
        let pk = sk.sk_to_pk().compress();
        Ok(sk.sign(digest, AUG_SCHEME_DST, &pk).compress())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        let pk = PublicKey::from_bytes(public_key)
            .map_err(|e| CurveError::InvalidPublicKey(format!("{:?}", e)))?;
        let sig = Signature::from_bytes(signature)
            .map_err(|e| CurveError::InvalidSignature(format!("{:?}", e)))?;
        let aug = pk.compress();

        Ok(sig.verify(true, digest, AUG_SCHEME_DST, &aug, &pk, true) == BLST_ERROR::BLST_SUCCESS)
    }
}

impl KeyDerivation for Bls12381Curve {
    /// EIP-2333 derivation. Every EIP-2333 child is hardened, so the
    /// hardened marker on a path component does not change the result.
    fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<Zeroizing<Vec<u8>>, CurveError> {
        let mut sk = SecretKey::derive_master_eip2333(seed)
            .map_err(|e| CurveError::DerivationFailed(format!("EIP-2333 master key: {:?}", e)))?;

        for component in &path.components {
            sk = sk.derive_child_eip2333(component.index);
        }

        Ok(Zeroizing::new(sk.to_bytes().to_vec()))
    }
}

impl SigningStrategy for Bls12381Curve {
    const BASE_SIGNATURE_LEN: usize = 96;

    /// The recovery flag is ignored: BLS signatures never carry one.
    fn sign_obligation(private_key: &[u8], digest: &[u8], _append_recovery: bool) -> Result<Vec<u8>, CurveError> {
        let synthetic = Zeroizing::new(synthetic_secret_key(private_key)?);
        Ok(Self::sign(synthetic.as_slice(), digest)?.to_vec())
    }
}

// MARK: - Tests
