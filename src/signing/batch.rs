//! Batch Signer
//!
//! Signs every obligation attached to a transaction, across every owning
//! account, and writes the hex signatures back.
//!
//! Commit policy: obligations are signed on a private copy of the signature
//! map. The caller's transaction is replaced only when every obligation
//! signed; on error it is left exactly as it was passed in.
//!
//! Order: obligations of one account are signed in list order when running
//! sequentially. Account order follows map iteration and is unspecified.

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::SignerConfig;
use crate::error::{SignerError, SignerResult};
use crate::types::{KeySignature, RawTransaction, SignatureMap, SmartContractRawTransaction};
use crate::utils::logging::Redactor;
use crate::wallet::keystore::{derive_private_key, KeyStore};

use super::policy;

/// Signs all obligations of a transaction with keys from a [`KeyStore`]
#[derive(Debug, Clone, Default)]
pub struct BatchSigner {
    config: SignerConfig,
}

impl BatchSigner {
    pub fn new(config: SignerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign every obligation of a value-transfer transaction.
    ///
    /// Fails with `IncompleteKeySet` before any signing when the creating
    /// account has no obligations or fewer than `reqSigs` are attached.
    pub fn sign_raw_transaction<S: KeyStore + ?Sized>(
        &self,
        tx: &mut RawTransaction,
        store: &S,
    ) -> SignerResult<()> {
        check_key_set(tx).map_err(|e| {
            error!(tx_id = %tx.tx_id, sid = %tx.sid, error = %e, "transaction rejected");
            e
        })?;

        let signed = self.sign_detached(&tx.signatures, store)?;
        tx.signatures = signed;

        info!(
            tx_id = %tx.tx_id,
            symbol = %tx.coin.symbol,
            obligations = tx.obligation_count(),
            "raw transaction signed"
        );
        Ok(())
    }

    /// Sign a standalone obligation map.
    ///
    /// On success `obligations` holds the signed map and a copy is returned;
    /// on error it is untouched.
    pub fn sign_tx_hash<S: KeyStore + ?Sized>(
        &self,
        obligations: &mut SignatureMap,
        store: &S,
    ) -> SignerResult<SignatureMap> {
        let signed = self.sign_detached(obligations, store)?;
        *obligations = signed.clone();
        Ok(signed)
    }

    /// Sign the obligations of a smart-contract call
    pub fn sign_smart_contract_transaction<S: KeyStore + ?Sized>(
        &self,
        tx: &mut SmartContractRawTransaction,
        store: &S,
    ) -> SignerResult<()> {
        self.sign_tx_hash(&mut tx.signatures, store)?;

        info!(
            tx_id = %tx.tx_id,
            symbol = %tx.coin.symbol,
            obligations = tx.obligation_count(),
            "smart contract transaction signed"
        );
        Ok(())
    }

    /// Sign a copy of `obligations` and return it
    fn sign_detached<S: KeyStore + ?Sized>(
        &self,
        obligations: &SignatureMap,
        store: &S,
    ) -> SignerResult<SignatureMap> {
        let mut working = obligations.clone();

        let work: Vec<(&str, &mut KeySignature)> = working
            .iter_mut()
            .flat_map(|(account, list)| list.iter_mut().map(move |ob| (account.as_str(), ob)))
            .collect();
        let total = work.len();

        let result = if self.config.parallel {
            work.into_par_iter()
                .try_for_each(|(account, obligation)| self.sign_one(store, account, obligation))
        } else {
            work.into_iter()
                .try_for_each(|(account, obligation)| self.sign_one(store, account, obligation))
        };

        if let Err(e) = result {
            error!(error = %e, obligations = total, "batch aborted, nothing committed");
            return Err(e);
        }

        debug!(obligations = total, parallel = self.config.parallel, "batch signed");
        Ok(working)
    }

    fn sign_one<S: KeyStore + ?Sized>(
        &self,
        store: &S,
        account_id: &str,
        obligation: &mut KeySignature,
    ) -> SignerResult<()> {
        let context = || format!("account={} input_index={}", account_id, obligation.input_index);

        let digest = policy::decode_digest(&obligation.message).map_err(|e| e.with_details(context()))?;
        let curve = policy::curve_for_ecc_type(obligation.ecc_type).map_err(|e| e.with_details(context()))?;

        let private_key = derive_private_key(store, &obligation.derived_path, curve)
            .map_err(|e| e.with_details(context()))?;

        let signature = policy::sign_with_ecc_type(&private_key, &digest, obligation.ecc_type, obligation.rsv)
            .map_err(|e| e.with_details(context()))?;
        let signature = hex::encode(signature);

        let redact = Redactor::from_config(&self.config);

        if obligation.is_signed() {
            warn!(
                account = %account_id,
                input_index = obligation.input_index,
                previous = %redact.hash(&obligation.signature),
                "overwriting existing signature"
            );
        }

        if self.config.verbose {
            debug!(
                account = %account_id,
                wallet = %obligation.wallet_id,
                input_index = obligation.input_index,
                curve = %curve,
                path = %obligation.derived_path,
                address = %redact.address(&obligation.address),
                msg = %redact.hash(&obligation.message),
                signed = %redact.hash(&signature),
                "obligation signed"
            );
        }

        obligation.signature = signature;
        Ok(())
    }
}

/// Every obligation the transaction needs must be present
fn check_key_set(tx: &RawTransaction) -> SignerResult<()> {
    if !tx.account_id.is_empty() && !tx.signatures.contains_key(&tx.account_id) {
        return Err(SignerError::incomplete_key_set(format!(
            "No signing obligations for account {}",
            tx.account_id
        ))
        .with_details(format!("account={}", tx.account_id)));
    }

    let present = tx.obligation_count() as u64;
    if present < tx.required {
        return Err(SignerError::incomplete_key_set(format!(
            "Transaction requires {} signatures, {} obligations attached",
            tx.required, present
        ))
        .with_details(format!("account={}", tx.account_id)));
    }

    Ok(())
}

// MARK: - Default-config entry points

/// Sign every obligation of `tx` with the default configuration
pub fn sign_raw_transaction<S: KeyStore + ?Sized>(tx: &mut RawTransaction, store: &S) -> SignerResult<()> {
    BatchSigner::default().sign_raw_transaction(tx, store)
}

/// Sign a standalone obligation map with the default configuration
pub fn sign_tx_hash<S: KeyStore + ?Sized>(
    obligations: &mut SignatureMap,
    store: &S,
) -> SignerResult<SignatureMap> {
    BatchSigner::default().sign_tx_hash(obligations, store)
}

/// Sign a smart-contract call with the default configuration
pub fn sign_smart_contract_transaction<S: KeyStore + ?Sized>(
    tx: &mut SmartContractRawTransaction,
    store: &S,
) -> SignerResult<()> {
    BatchSigner::default().sign_smart_contract_transaction(tx, store)
}
