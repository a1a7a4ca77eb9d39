//! Shared types for the signing engine
//!
//! Wire structures exchanged with the custody service. Field names are part
//! of the external contract and must round-trip through JSON unchanged.
//! Missing fields (and `null` collections) decode to their zero values, the
//! way the service's own encoder produces them.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::crypto::curves::CurveType;

/// Obligations keyed by owning account id
pub type SignatureMap = HashMap<String, Vec<KeySignature>>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Signing Obligations
// =============================================================================

/// One signature the transaction's spending conditions require
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySignature {
    /// Curve identifier, see `crypto::curves::ecc_types`
    #[serde(rename = "eccType")]
    pub ecc_type: u32,
    /// Append the recovery byte to the signature
    pub rsv: bool,
    pub nonce: String,
    /// Address expected to produce the signature
    pub address: String,
    /// Hex signature, empty until signed
    #[serde(rename = "signed")]
    pub signature: String,
    /// Hex digest to sign
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(rename = "derivedPath")]
    pub derived_path: String,
    #[serde(rename = "walletID")]
    pub wallet_id: String,
    #[serde(rename = "inputIndex")]
    pub input_index: u32,
}

impl KeySignature {
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// The curve named by `eccType`, if known
    pub fn curve(&self) -> Option<CurveType> {
        CurveType::from_ecc_type(self.ecc_type)
    }
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coin {
    pub symbol: String,
    #[serde(rename = "isContract")]
    pub is_contract: bool,
    #[serde(rename = "contractID")]
    pub contract_id: String,
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
    #[serde(rename = "contractABI")]
    pub contract_abi: String,
}

/// Error attached by the service to a rejected transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMsg {
    pub code: u64,
    pub err: String,
}

/// Plain value-transfer transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTransaction {
    pub coin: Coin,
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub sid: String,
    #[serde(rename = "rawHex")]
    pub raw_hex: String,
    #[serde(rename = "feeRate")]
    pub fee_rate: String,
    /// Destination address to amount
    #[serde(deserialize_with = "null_as_default")]
    pub to: HashMap<String, String>,
    #[serde(rename = "accountID")]
    pub account_id: String,
    #[serde(rename = "sigParts", deserialize_with = "null_as_default")]
    pub signatures: SignatureMap,
    #[serde(rename = "reqSigs")]
    pub required: u64,
    pub fees: String,
    #[serde(rename = "errorMsg", skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<ErrorMsg>,
}

impl RawTransaction {
    pub fn obligation_count(&self) -> usize {
        obligation_count(&self.signatures)
    }

    pub fn is_fully_signed(&self) -> bool {
        is_fully_signed(&self.signatures)
    }
}

/// Smart-contract call transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartContractRawTransaction {
    pub coin: Coin,
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub sid: String,
    #[serde(rename = "accountID")]
    pub account_id: String,
    #[serde(rename = "sigParts", deserialize_with = "null_as_default")]
    pub signatures: SignatureMap,
    /// Call payload, encoded per `raw_type`
    pub raw: String,
    /// 0: hex, 1: json, 2: base64
    #[serde(rename = "rawType")]
    pub raw_type: u64,
    /// `[method, arg1, arg2, ...]`
    #[serde(rename = "abiParam", deserialize_with = "null_as_default")]
    pub abi_param: Vec<String>,
    pub value: String,
    #[serde(rename = "feeRate")]
    pub fee_rate: String,
    pub fees: String,
    #[serde(rename = "awaitResult")]
    pub await_result: bool,
    /// Seconds; 0 means the service default
    #[serde(rename = "awaitTimeout")]
    pub await_timeout: u64,
}

impl SmartContractRawTransaction {
    pub fn obligation_count(&self) -> usize {
        obligation_count(&self.signatures)
    }

    pub fn is_fully_signed(&self) -> bool {
        is_fully_signed(&self.signatures)
    }
}

/// Total obligations across every account
pub fn obligation_count(signatures: &SignatureMap) -> usize {
    signatures.values().map(Vec::len).sum()
}

pub fn is_fully_signed(signatures: &SignatureMap) -> bool {
    signatures.values().flatten().all(KeySignature::is_signed)
}

// =============================================================================
// API Response
// =============================================================================

/// Envelope returned across the FFI boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<crate::error::SignerError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: crate::error::SignerError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"code":"internal","message":"Serialization failed"}}"#.to_string()
        })
    }
}
