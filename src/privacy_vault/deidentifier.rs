// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// De-identification entry point

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::classifier::FieldClassifier;
use super::config::DeIdentifierConfig;
use super::error::VaultResult;
use super::reidentify;
use super::store::VaultStore;
use super::tokenizer::Tokenizer;
use super::value::Value;
use super::vault::SessionVault;
use super::walker::{empty_counts, FieldCounts, TreeWalker};

/// Summary returned after de-identification
#[derive(Debug, Clone, Serialize)]
pub struct DeIdentificationResult {
    /// Needed later to re-identify
    pub vault_id: String,
    /// Safe to forward to an external analysis service
    pub sanitized_data: Value,
    pub field_counts: FieldCounts,
    pub total_tokenized: usize,
}

/// Scans nested financial records and replaces sensitive fields with tokens
///
/// Each `de_identify` call builds a fresh `SessionVault` and registers it in
/// the shared `VaultStore` once the walk is complete. Nothing is registered
/// for a call that does not finish.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use privacy_vault::{DeIdentifier, DeIdentifierConfig, StoreConfig, Value, VaultStore};
///
/// let store = Arc::new(VaultStore::new(&StoreConfig::default()).unwrap());
/// let engine = DeIdentifier::new(DeIdentifierConfig::default(), Arc::clone(&store));
///
/// let data: Value = serde_json::from_str(r#"{"Name": "Acme Pty Ltd", "Total": 120.0}"#).unwrap();
/// let result = engine.de_identify(&data);
/// assert_eq!(result.sanitized_data.get("Name").and_then(Value::as_str), Some("ENTITY_001"));
///
/// let analysis = Value::from("ENTITY_001 has overdue invoices");
/// let restored = engine.re_identify(&analysis, &result.vault_id, true).unwrap();
/// assert_eq!(restored.as_str(), Some("Acme Pty Ltd has overdue invoices"));
/// ```
#[derive(Debug, Clone)]
pub struct DeIdentifier {
    config: DeIdentifierConfig,
    classifier: FieldClassifier,
    tokenizer: Tokenizer,
    store: Arc<VaultStore>,
}

impl DeIdentifier {
    pub fn new(config: DeIdentifierConfig, store: Arc<VaultStore>) -> Self {
        let classifier = FieldClassifier::new(config.extra_sensitive_fields.as_slice());
        let tokenizer = Tokenizer::new(&config);
        Self {
            config,
            classifier,
            tokenizer,
            store,
        }
    }

    pub fn config(&self) -> &DeIdentifierConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<VaultStore> {
        &self.store
    }

    pub fn classifier(&self) -> &FieldClassifier {
        &self.classifier
    }

    /// Tokenize every sensitive field in `data`
    ///
    /// `data` is not modified; a new tree is returned in the result.
    pub fn de_identify(&self, data: &Value) -> DeIdentificationResult {
        let mut vault = SessionVault::new(self.config.ttl_seconds);
        let mut counts = empty_counts();

        let walker = TreeWalker::new(&self.classifier, &self.tokenizer);
        let sanitized_data = walker.walk(data, &mut vault, &mut counts, "$");

        let vault_id = vault.vault_id().to_string();
        let entity_count = vault.entity_count();
        let expires_at = vault.expires_at();
        self.store.register(vault);

        let total_tokenized: usize = counts.values().sum();

        info!(
            total_tokenized,
            entity_count,
            vault_id = %vault_id,
            expires_at = %expires_at.to_rfc3339(),
            redact_mode = self.config.redact_mode,
            "De-identified sensitive fields"
        );

        DeIdentificationResult {
            vault_id,
            sanitized_data,
            field_counts: counts,
            total_tokenized,
        }
    }

    /// De-identify a list of Xero/MYOB-style contact objects
    pub fn de_identify_contacts(&self, contacts: &[Value]) -> DeIdentificationResult {
        self.de_identify_records(contacts)
    }

    /// De-identify a list of invoices (embedded contacts, line items)
    pub fn de_identify_invoices(&self, invoices: &[Value]) -> DeIdentificationResult {
        self.de_identify_records(invoices)
    }

    /// De-identify a list of transaction or journal objects
    pub fn de_identify_transactions(&self, transactions: &[Value]) -> DeIdentificationResult {
        self.de_identify_records(transactions)
    }

    fn de_identify_records(&self, records: &[Value]) -> DeIdentificationResult {
        self.de_identify(&Value::Sequence(records.to_vec()))
    }

    /// Restore originals in `output` using this identifier's store
    ///
    /// # Errors
    ///
    /// See [`reidentify::re_identify`].
    pub fn re_identify(
        &self,
        output: &Value,
        vault_id: &str,
        destroy_after: bool,
    ) -> VaultResult<Value> {
        reidentify::re_identify(&self.store, output, vault_id, destroy_after)
    }

    /// Destroy a vault explicitly
    pub fn destroy_vault(&self, vault_id: &str) -> bool {
        self.store.destroy(vault_id)
    }
}
