//! Transaction Signing
//!
//! - `policy`: curve-driven choice of algorithm and signature encoding
//! - `batch`: signs every obligation of a transaction and commits atomically

pub mod batch;
pub mod policy;

pub use batch::{sign_raw_transaction, sign_smart_contract_transaction, sign_tx_hash, BatchSigner};
pub use policy::{curve_for_ecc_type, decode_digest, sign, sign_with_ecc_type};
