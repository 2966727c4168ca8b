// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Privacy Vault - reversible tokenization of sensitive fields
//
// - Field-name classification with an allow-list that beats looser patterns
// - Value-keyed tokens, stable within one session vault
// - Concurrent vault store with a background expiry sweep
// - Longest-first single-pass token substitution on re-identification

pub mod classifier;
pub mod config;
pub mod deidentifier;
pub mod error;
pub mod patterns;
#[cfg(feature = "python")]
pub mod python;
pub mod reidentify;
pub mod store;
pub mod tokenizer;
pub mod value;
pub mod vault;
pub mod walker;

pub use classifier::FieldClassifier;
pub use config::{DeIdentifierConfig, SensitivityCategory, StoreConfig};
pub use deidentifier::{DeIdentificationResult, DeIdentifier};
pub use error::{VaultError, VaultResult};
#[cfg(feature = "python")]
pub use python::PrivacyVaultRust;
pub use reidentify::{re_identify, TokenReplacer};
pub use store::{VaultStats, VaultStore};
pub use tokenizer::Tokenizer;
pub use value::Value;
pub use vault::{SessionVault, VaultEntry};
pub use walker::{FieldCounts, TreeWalker};
