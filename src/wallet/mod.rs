//! Wallet Module
//!
//! Derivation path parsing and the key stores signing obligations draw
//! their child keys from.

pub mod derivation_path;
pub mod keystore;

pub use derivation_path::{DerivationComponent, DerivationPath, PathError, HARDENED};
pub use keystore::{derive_private_key, ChildKey, DerivedKey, KeyStore, KeyStoreError, MasterKey};
