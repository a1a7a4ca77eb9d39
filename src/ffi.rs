//! FFI Layer
//!
//! All C-ABI exports are defined here. All functions follow a consistent pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `openw_free_string`)
//!
//! Error handling: All functions return JSON with `success` field.
//! On error, `success: false` and `error` object is populated.
//!
//! Request shape shared by the signing calls:
//!
//! ```json
//! {
//!   "transaction": { ... },
//!   "seedHex": "000102...",          // or
//!   "mnemonic": "word1 word2 ...",
//!   "passphrase": "",
//!   "config": { "parallel": true }
//! }
//! ```

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::SignerConfig;
use crate::error::{SignerError, SignerResult};
use crate::signing::BatchSigner;
use crate::types::*;
use crate::wallet::keystore::MasterKey;

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any openw_* function
///
/// # Safety
/// The pointer must have been returned by an openw_* function
#[unsafe(no_mangle)]
pub extern "C" fn openw_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert C string to Rust string, returning error JSON if invalid
fn parse_input<'a>(input: *const c_char) -> Result<&'a str, *mut c_char> {
    if input.is_null() {
        return Err(error_response(SignerError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    c_str
        .to_str()
        .map_err(|_| error_response(SignerError::invalid_input("Invalid UTF-8 string")))
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: SignerError) -> *mut c_char {
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        // Last resort: return a minimal error
        Err(_) => c"{\"success\":false,\"error\":{\"code\":\"internal\",\"message\":\"String conversion failed\"}}"
            .to_owned()
            .into_raw(),
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Deserialize)] // no Debug: carries key material
#[serde(rename_all = "camelCase")]
struct SignRequest<T> {
    transaction: T,
    #[serde(default)]
    seed_hex: Option<String>,
    #[serde(default)]
    mnemonic: Option<String>,
    #[serde(default)]
    passphrase: String,
    #[serde(default)]
    config: Option<SignerConfig>,
}

impl<T> SignRequest<T> {
    fn master_key(&self) -> SignerResult<MasterKey> {
        let key = match (&self.seed_hex, &self.mnemonic) {
            (Some(seed_hex), None) => MasterKey::from_seed_hex(seed_hex)?,
            (None, Some(mnemonic)) => MasterKey::from_mnemonic(mnemonic, &self.passphrase)?,
            (Some(_), Some(_)) => {
                return Err(SignerError::invalid_input("Provide either seedHex or mnemonic, not both"))
            }
            (None, None) => return Err(SignerError::invalid_input("Missing seedHex or mnemonic")),
        };
        Ok(key)
    }

    fn signer(&self) -> BatchSigner {
        BatchSigner::new(self.config.unwrap_or_else(SignerConfig::from_env))
    }
}

fn parse_request<T: DeserializeOwned>(json_str: &str) -> SignerResult<SignRequest<T>> {
    serde_json::from_str(json_str)
        .map_err(|e| SignerError::new(crate::error::ErrorCode::JsonError, format!("Invalid JSON: {}", e)))
}

// =============================================================================
// Signing Operations
// =============================================================================

/// Sign every obligation of a value-transfer transaction
///
/// # Input
/// `SignRequest` with a `RawTransaction` under `transaction`
///
/// # Output
/// ```json
/// { "success": true, "data": { "coin": {...}, "sigParts": {...}, ... } }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn openw_sign_raw_transaction(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    let result = (|| {
        let request: SignRequest<RawTransaction> = parse_request(json_str)?;
        let key = request.master_key()?;
        let signer = request.signer();

        let mut tx = request.transaction;
        signer.sign_raw_transaction(&mut tx, &key)?;
        Ok::<_, SignerError>(tx)
    })();

    match result {
        Ok(tx) => success_response(tx),
        Err(e) => error_response(e),
    }
}

/// Sign the obligations of a smart-contract call
///
/// # Input
/// `SignRequest` with a `SmartContractRawTransaction` under `transaction`
///
/// # Output
/// The transaction with `sigParts` signed
#[unsafe(no_mangle)]
pub extern "C" fn openw_sign_smart_contract_transaction(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    let result = (|| {
        let request: SignRequest<SmartContractRawTransaction> = parse_request(json_str)?;
        let key = request.master_key()?;
        let signer = request.signer();

        let mut tx = request.transaction;
        signer.sign_smart_contract_transaction(&mut tx, &key)?;
        Ok::<_, SignerError>(tx)
    })();

    match result {
        Ok(tx) => success_response(tx),
        Err(e) => error_response(e),
    }
}

/// Sign a standalone obligation map (`accountID -> [KeySignature]`)
#[unsafe(no_mangle)]
pub extern "C" fn openw_sign_tx_hash(input: *const c_char) -> *mut c_char {
    let json_str = match parse_input(input) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    let result: SignerResult<SignatureMap> = (|| {
        let request: SignRequest<SignatureMap> = parse_request(json_str)?;
        let key = request.master_key()?;
        let signer = request.signer();

        let mut obligations = request.transaction;
        signer.sign_tx_hash(&mut obligations, &key)
    })();

    match result {
        Ok(map) => success_response(map),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curves::ecc_types;

    fn call(f: extern "C" fn(*const c_char) -> *mut c_char, input: &str) -> serde_json::Value {
        let input = CString::new(input).unwrap();
        let out = f(input.as_ptr());
        let json = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        openw_free_string(out);
        serde_json::from_str(&json).unwrap()
    }

    fn request(transaction: serde_json::Value) -> String {
        serde_json::json!({
            "transaction": transaction,
            "seedHex": "000102030405060708090a0b0c0d0e0f",
        })
        .to_string()
    }

    #[test]
    fn test_sign_raw_transaction_ffi() {
        let tx = serde_json::json!({
            "coin": {"symbol": "BTC"},
            "accountID": "acct-1",
            "reqSigs": 1,
            "sigParts": {"acct-1": [{
                "eccType": ecc_types::SECP256K1,
                "msg": "ab".repeat(32),
                "derivedPath": "m/44'/0'/0'/0/0",
                "rsv": true
            }]}
        });

        let response = call(openw_sign_raw_transaction, &request(tx));
        assert_eq!(response["success"], true);
        let signed = response["data"]["sigParts"]["acct-1"][0]["signed"].as_str().unwrap();
        assert_eq!(signed.len(), 130);
    }

    #[test]
    fn test_error_response_ffi() {
        let tx = serde_json::json!({
            "accountID": "acct-1",
            "sigParts": {"acct-1": [{"eccType": ecc_types::ED25519, "msg": "xyz", "derivedPath": "m/0'"}]}
        });

        let response = call(openw_sign_smart_contract_transaction, &request(tx));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "digest_decode_error");
    }

    #[test]
    fn test_missing_key_material() {
        let response = call(openw_sign_tx_hash, r#"{"transaction": {}}"#);
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "invalid_input");

        let response = call(openw_sign_tx_hash, "not json");
        assert_eq!(response["error"]["code"], "json_error");
    }

    #[test]
    fn test_null_input() {
        let out = openw_sign_tx_hash(std::ptr::null());
        let json = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        openw_free_string(out);
        assert!(json.contains("invalid_input"));
    }
}
