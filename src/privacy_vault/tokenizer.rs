// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Token minting for sensitive values

use super::config::{DeIdentifierConfig, SensitivityCategory};
use super::vault::{SessionVault, VaultEntry};

/// Mints tokens into the session vault being built
///
/// Holds no mapping state of its own; everything reversible lives in the
/// `SessionVault` passed to `tokenize`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    redact_mode: bool,
    redaction_text: String,
}

impl Tokenizer {
    pub fn new(config: &DeIdentifierConfig) -> Self {
        Self {
            redact_mode: config.redact_mode,
            redaction_text: config.redaction_text.clone(),
        }
    }

    /// Return the token for `original`, minting one if this session has not
    /// seen the value before. Surrounding whitespace is ignored.
    pub fn tokenize(
        &self,
        original: &str,
        category: SensitivityCategory,
        path: &str,
        vault: &mut SessionVault,
    ) -> String {
        let original = original.trim();

        if let Some(existing) = vault.token_for(original) {
            return existing.to_string();
        }

        if self.redact_mode {
            return self.redaction_text.clone();
        }

        let sequence = vault.next_sequence();
        let token = format_token(category, sequence);

        vault.insert(VaultEntry {
            token: token.clone(),
            original: original.to_string(),
            category,
            path: path.to_string(),
        });

        token
    }
}

/// `<PREFIX>_<sequence>` with the sequence zero-padded to 3 digits
pub fn format_token(category: SensitivityCategory, sequence: u64) -> String {
    format!("{}_{:03}", category.token_prefix(), sequence)
}
