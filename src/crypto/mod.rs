//! Cryptographic primitives for the signing engine
//!
//! This module provides:
//! - Multi-curve abstractions (secp256k1, secp256r1, ed25519, BLS12-381)
//! - The BLS synthetic secret key offset scheme

pub mod curves;
pub mod synthetic;

pub use curves::{
    CurveType, CurveError,
    Secp256k1Curve, Secp256r1Curve, Ed25519Curve, Bls12381Curve,
    EllipticCurve, RecoverableSignature, KeyDerivation, SigningStrategy,
};
pub use synthetic::{
    synthetic_public_key, synthetic_secret_key,
    DEFAULT_HIDDEN_PUZZLE_HASH, GROUP_ORDER,
};
