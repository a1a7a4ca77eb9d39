//! OpenW Signer Library
//!
//! Local signing engine for custody-service transactions.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: derivation paths and the key stores child keys come from
//! - **crypto**: secp256k1, secp256r1, Ed25519 and BLS12-381 plus the BLS synthetic key scheme
//! - **signing**: the per-curve signature policy and the batch signer
//! - **ffi**: C-ABI exports
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `openw_free_string`)
//!
//! # Security
//!
//! Seeds and derived child keys live in `Zeroizing` buffers and are
//! cleared when dropped. Nothing is persisted.
//!
//! # Example
//!
//! ```rust,ignore
//! use openw_signer::{sign_raw_transaction, MasterKey, RawTransaction};
//!
//! let key = MasterKey::from_mnemonic(phrase, "")?;
//! let mut tx: RawTransaction = serde_json::from_str(&json)?;
//! sign_raw_transaction(&mut tx, &key)?;
//! assert!(tx.is_fully_signed());
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod ffi;
pub mod signing;
pub mod types;
pub mod utils;
pub mod wallet;

// Re-export key types for convenience
pub use config::SignerConfig;
pub use crypto::curves::CurveType;
pub use error::{ErrorCode, SignerError, SignerResult};
pub use signing::{sign_raw_transaction, sign_smart_contract_transaction, sign_tx_hash, BatchSigner};
pub use types::*;
pub use wallet::{ChildKey, KeyStore, KeyStoreError, MasterKey};

pub use ffi::{
    openw_free_string,
    openw_sign_raw_transaction,
    openw_sign_smart_contract_transaction,
    openw_sign_tx_hash,
};
