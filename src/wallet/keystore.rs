//! Key Store
//!
//! The signing engine never owns key material for longer than one
//! obligation. It asks a [`KeyStore`] for the child key at an obligation's
//! path and drops the bytes as soon as the signature is produced.
//!
//! [`MasterKey`] is the in-process implementation backed by a seed. HSM or
//! remote stores implement the same traits and report their own timeouts as
//! [`KeyStoreError::Timeout`].
//!
//! SECURITY: seeds and child keys live in `Zeroizing` buffers.

use bip39::{Language, Mnemonic};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::curves::{
    Bls12381Curve, CurveError, CurveType, Ed25519Curve, KeyDerivation, Secp256k1Curve,
    Secp256r1Curve,
};
use crate::error::{SignerError, SignerResult};

use super::derivation_path::DerivationPath;

/// Minimum seed length accepted by BIP-32
pub const MIN_SEED_LEN: usize = 16;
/// Maximum seed length accepted by BIP-32
pub const MAX_SEED_LEN: usize = 64;

/// Errors reported by a key store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStoreError {
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
    #[error("curve not supported by key store: {0}")]
    UnsupportedCurve(String),
    #[error("invalid seed: {0}")]
    InvalidSeed(String),
    #[error("derivation failed: {0}")]
    Derivation(String),
    #[error("key store timed out: {0}")]
    Timeout(String),
}

impl From<CurveError> for KeyStoreError {
    fn from(e: CurveError) -> Self {
        match e {
            CurveError::UnsupportedCurve(s) => KeyStoreError::UnsupportedCurve(s),
            other => KeyStoreError::Derivation(other.to_string()),
        }
    }
}

/// A derived child key
pub trait ChildKey {
    fn private_key_bytes(&self) -> Result<Zeroizing<Vec<u8>>, KeyStoreError>;
}

/// Source of child keys for signing obligations.
///
/// Implementations must be safe to read from several threads at once; the
/// batch signer may derive keys for independent obligations in parallel.
pub trait KeyStore: Sync {
    type Child: ChildKey;

    fn derived_key_with_path(&self, path: &str, curve: CurveType) -> Result<Self::Child, KeyStoreError>;
}

// MARK: - Seed-backed key store

/// Hierarchical-deterministic master key held as its seed
#[derive(Clone)]
pub struct MasterKey {
    seed: Zeroizing<Vec<u8>>,
}

impl MasterKey {
    pub fn from_seed(seed: &[u8]) -> Result<Self, KeyStoreError> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(KeyStoreError::InvalidSeed(format!(
                "seed must be {} to {} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                seed.len()
            )));
        }
        Ok(Self {
            seed: Zeroizing::new(seed.to_vec()),
        })
    }

    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, KeyStoreError> {
        let seed = Zeroizing::new(
            hex::decode(seed_hex.trim())
                .map_err(|e| KeyStoreError::InvalidSeed(format!("seed is not hex: {}", e)))?,
        );
        Self::from_seed(&seed)
    }

    /// Restore from an English BIP-39 phrase and optional passphrase.
    ///
    /// The phrase is lowercased and whitespace-collapsed; the passphrase is
    /// used as given and must already be NFKD-normalized.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, KeyStoreError> {
        let normalized = Zeroizing::new(
            phrase
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" "),
        );
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| KeyStoreError::InvalidSeed(format!("invalid mnemonic: {}", e)))?;

        let seed = Zeroizing::new(mnemonic.to_seed_normalized(passphrase));
        Self::from_seed(seed.as_ref())
    }

    /// Derive the raw child private key for `curve` at `path`
    pub fn derive(&self, path: &DerivationPath, curve: CurveType) -> Result<Zeroizing<Vec<u8>>, KeyStoreError> {
        let key = match curve {
            CurveType::Secp256k1 => Secp256k1Curve::derive_path(&self.seed, path)?,
            CurveType::Secp256r1 => Secp256r1Curve::derive_path(&self.seed, path)?,
            CurveType::Ed25519 => Ed25519Curve::derive_path(&self.seed, path)?,
            CurveType::Bls12381G2Aug => Bls12381Curve::derive_path(&self.seed, path)?,
        };
        Ok(key)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("seed", &format_args!("[REDACTED {} bytes]", self.seed.len()))
            .finish()
    }
}

/// Child key derived by [`MasterKey`]
pub struct DerivedKey {
    curve: CurveType,
    path: DerivationPath,
    private_key: Zeroizing<Vec<u8>>,
}

impl DerivedKey {
    pub fn curve(&self) -> CurveType {
        self.curve
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }
}

impl ChildKey for DerivedKey {
    fn private_key_bytes(&self) -> Result<Zeroizing<Vec<u8>>, KeyStoreError> {
        Ok(self.private_key.clone())
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("curve", &self.curve)
            .field("path", &self.path.to_string())
            .finish_non_exhaustive()
    }
}

impl KeyStore for MasterKey {
    type Child = DerivedKey;

    fn derived_key_with_path(&self, path: &str, curve: CurveType) -> Result<DerivedKey, KeyStoreError> {
        let path: DerivationPath = path
            .parse()
            .map_err(|e| KeyStoreError::InvalidPath(format!("'{}': {}", path, e)))?;
        let private_key = self.derive(&path, curve)?;

        Ok(DerivedKey {
            curve,
            path,
            private_key,
        })
    }
}

// MARK: - KeyDerivation contract

/// Derive the child private key for an obligation.
///
/// Deterministic in (store, path, curve); the store is only read.
pub fn derive_private_key<S: KeyStore + ?Sized>(
    store: &S,
    path: &str,
    curve: CurveType,
) -> SignerResult<Zeroizing<Vec<u8>>> {
    let child = store.derived_key_with_path(path, curve).map_err(SignerError::from)?;
    Ok(child.private_key_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn master() -> MasterKey {
        MasterKey::from_seed_hex("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_seed_length_bounds() {
        assert!(MasterKey::from_seed(&[0u8; 15]).is_err());
        assert!(MasterKey::from_seed(&[0u8; 16]).is_ok());
        assert!(MasterKey::from_seed(&[0u8; 64]).is_ok());
        assert!(matches!(MasterKey::from_seed(&[0u8; 65]), Err(KeyStoreError::InvalidSeed(_))));
        assert!(matches!(MasterKey::from_seed_hex("xyz"), Err(KeyStoreError::InvalidSeed(_))));
    }

    #[test]
    fn test_mnemonic_seed() {
        // BIP-39 reference vector with passphrase "TREZOR"
        let key = MasterKey::from_mnemonic(PHRASE, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(key.seed.as_slice()),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );

        let shouted = MasterKey::from_mnemonic(&PHRASE.to_uppercase(), "TREZOR").unwrap();
        assert_eq!(shouted.seed.as_slice(), key.seed.as_slice());

        assert!(MasterKey::from_mnemonic("abandon abandon", "").is_err());
    }

    #[test]
    fn test_debug_redacts_seed() {
        let printed = format!("{:?}", master());
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("0001020304"));
    }

    #[test]
    fn test_derived_key_matches_curve_derivation() {
        let child = master().derived_key_with_path("m/0'/1/2'/2/1000000000", CurveType::Secp256k1).unwrap();
        assert_eq!(child.curve(), CurveType::Secp256k1);
        assert_eq!(child.path().depth(), 5);
        assert_eq!(
            hex::encode(child.private_key_bytes().unwrap().as_slice()),
            "471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8"
        );
    }

    #[test]
    fn test_derivation_is_deterministic_per_curve() {
        let store = master();
        for curve in CurveType::ALL {
            if curve == CurveType::Bls12381G2Aug {
                continue; // EIP-2333 needs a 32-byte seed
            }
            let a = derive_private_key(&store, "m/44'/0'/0'/0/0", curve).unwrap();
            let b = derive_private_key(&store, "m/44'/0'/0'/0/0", curve).unwrap();
            let c = derive_private_key(&store, "m/44'/0'/0'/0/1", curve).unwrap();
            assert_eq!(a.len(), 32);
            assert_eq!(a.as_slice(), b.as_slice());
            assert_ne!(a.as_slice(), c.as_slice());
        }
    }

    #[test]
    fn test_bls_derivation_from_mnemonic() {
        let store = MasterKey::from_mnemonic(PHRASE, "TREZOR").unwrap();
        let key = derive_private_key(&store, "m/0", CurveType::Bls12381G2Aug).unwrap();
        // EIP-2333 test case 0
        assert_eq!(
            hex::encode(key.as_slice()),
            "2d18bd6c14e6d15bf8b5085c9b74f3daae3b03cc2014770a599d8c1539e50f8e"
        );
    }

    #[test]
    fn test_invalid_path_maps_to_taxonomy() {
        let err = derive_private_key(&master(), "44'/0'", CurveType::Secp256k1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDerivationPath);

        let err = derive_private_key(&master(), "m/0", CurveType::Bls12381G2Aug).unwrap_err();
        assert_eq!(err.code, ErrorCode::DerivationError);
    }
}
