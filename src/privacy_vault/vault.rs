// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Session vault: token <-> original mapping for one de-identification call

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::config::SensitivityCategory;

/// A single binding between an original value and its token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultEntry {
    pub token: String,
    pub original: String,
    pub category: SensitivityCategory,
    /// Path where the value was first observed, e.g. `$[0].Contact.Name`
    pub path: String,
}

/// The mapping for one de-identification session
///
/// Entries are append-only. Once registered in a `VaultStore` the vault is
/// shared read-only until it is removed.
#[derive(Debug, Clone, Serialize)]
pub struct SessionVault {
    vault_id: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    entity_count: u64,
    entries: HashMap<String, VaultEntry>,
    reverse_index: HashMap<String, String>,
}

impl SessionVault {
    /// Create an empty vault with a fresh unguessable identifier
    pub fn new(ttl_seconds: u64) -> Self {
        Self::new_at(ttl_seconds, Utc::now())
    }

    pub(crate) fn new_at(ttl_seconds: u64, created_at: DateTime<Utc>) -> Self {
        let expires_at = i64::try_from(ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            vault_id: generate_vault_id(),
            created_at,
            expires_at,
            entity_count: 0,
            entries: HashMap::new(),
            reverse_index: HashMap::new(),
        }
    }

    pub fn vault_id(&self) -> &str {
        &self.vault_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Number of unique originals tokenized so far
    pub fn entity_count(&self) -> u64 {
        self.entity_count
    }

    pub fn entries(&self) -> impl Iterator<Item = &VaultEntry> {
        self.entries.values()
    }

    pub fn entry(&self, token: &str) -> Option<&VaultEntry> {
        self.entries.get(token)
    }

    /// Existing token for an original value
    pub fn token_for(&self, original: &str) -> Option<&str> {
        self.reverse_index.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expired once `now` reaches the expiry timestamp
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Advance the entity counter and return the next sequence number
    pub(crate) fn next_sequence(&mut self) -> u64 {
        self.entity_count += 1;
        self.entity_count
    }

    /// Record a new binding in both indices
    ///
    /// Existing bindings are never overwritten.
    pub(crate) fn insert(&mut self, entry: VaultEntry) {
        if self.entries.contains_key(&entry.token) {
            return;
        }
        self.reverse_index
            .entry(entry.original.clone())
            .or_insert_with(|| entry.token.clone());
        self.entries.insert(entry.token.clone(), entry);
    }

    /// (token, original) pairs, longest token first
    pub fn token_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .entries
            .values()
            .map(|entry| (entry.token.as_str(), entry.original.as_str()))
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        pairs
    }
}

/// `vault_` followed by 128 bits from the OS random source, hex encoded
fn generate_vault_id() -> String {
    format!("vault_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, original: &str) -> VaultEntry {
        VaultEntry {
            token: token.to_string(),
            original: original.to_string(),
            category: SensitivityCategory::Name,
            path: "$.name".to_string(),
        }
    }

    #[test]
    fn test_vault_id_format() {
        let vault = SessionVault::new(60);
        let id = vault.vault_id();
        assert!(id.starts_with("vault_"));
        assert_eq!(id.len(), "vault_".len() + 32);
        assert!(id["vault_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_vault_ids_are_unique() {
        let a = SessionVault::new(60);
        let b = SessionVault::new(60);
        assert_ne!(a.vault_id(), b.vault_id());
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let vault = SessionVault::new_at(30, now);
        assert_eq!(vault.expires_at() - vault.created_at(), TimeDelta::seconds(30));
        assert!(!vault.is_expired_at(now));
        assert!(vault.is_expired_at(now + TimeDelta::seconds(30)));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let now = Utc::now();
        let vault = SessionVault::new_at(0, now);
        assert!(vault.is_expired_at(now));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let vault = SessionVault::new(u64::MAX);
        assert_eq!(vault.expires_at(), DateTime::<Utc>::MAX_UTC);
        assert!(!vault.is_expired());
    }

    #[test]
    fn test_insert_never_rebinds_token() {
        let mut vault = SessionVault::new(60);
        vault.insert(entry("ENTITY_001", "Alice"));
        vault.insert(entry("ENTITY_001", "Mallory"));
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.entry("ENTITY_001").unwrap().original, "Alice");
        assert_eq!(vault.token_for("Alice"), Some("ENTITY_001"));
        assert_eq!(vault.token_for("Mallory"), None);
    }

    #[test]
    fn test_token_pairs_longest_first() {
        let mut vault = SessionVault::new(60);
        vault.insert(entry("ENTITY_1", "Alice"));
        vault.insert(entry("ENTITY_12", "Bob"));
        vault.insert(entry("ENTITY_123", "Carol"));
        let tokens: Vec<&str> = vault.token_pairs().into_iter().map(|(t, _)| t).collect();
        assert_eq!(tokens, vec!["ENTITY_123", "ENTITY_12", "ENTITY_1"]);
    }
}
