// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for the privacy vault

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Categories of sensitive fields that are detected and tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityCategory {
    Name,
    Address,
    Email,
    Phone,
    #[serde(rename = "abn")]
    BusinessNumber,
    BankAccount,
    TaxNumber,
}

impl SensitivityCategory {
    /// All categories, in classification order
    pub const ALL: [SensitivityCategory; 7] = [
        SensitivityCategory::Name,
        SensitivityCategory::Address,
        SensitivityCategory::Email,
        SensitivityCategory::Phone,
        SensitivityCategory::BusinessNumber,
        SensitivityCategory::BankAccount,
        SensitivityCategory::TaxNumber,
    ];

    /// Convert SensitivityCategory to its stable string form
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityCategory::Name => "name",
            SensitivityCategory::Address => "address",
            SensitivityCategory::Email => "email",
            SensitivityCategory::Phone => "phone",
            SensitivityCategory::BusinessNumber => "abn",
            SensitivityCategory::BankAccount => "bank_account",
            SensitivityCategory::TaxNumber => "tax_number",
        }
    }

    /// Token prefix, e.g. `ENTITY` in `ENTITY_001`
    pub fn token_prefix(&self) -> &'static str {
        match self {
            SensitivityCategory::Name => "ENTITY",
            SensitivityCategory::Address => "ADDRESS",
            SensitivityCategory::Email => "EMAIL",
            SensitivityCategory::Phone => "PHONE",
            SensitivityCategory::BusinessNumber => "ABN",
            SensitivityCategory::BankAccount => "ACCOUNT",
            SensitivityCategory::TaxNumber => "TAXREF",
        }
    }
}

impl fmt::Display for SensitivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a `DeIdentifier`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeIdentifierConfig {
    /// How long a vault stays usable for re-identification
    pub ttl_seconds: u64,

    /// Additional field-name substrings treated as `Name` fields
    pub extra_sensitive_fields: Vec<String>,

    /// Replace sensitive values with `redaction_text` instead of reversible tokens
    pub redact_mode: bool,

    /// Sentinel written in place of sensitive values in redact mode
    pub redaction_text: String,
}

impl Default for DeIdentifierConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 1800,
            extra_sensitive_fields: Vec::new(),
            redact_mode: false,
            redaction_text: "[REDACTED]".to_string(),
        }
    }
}

impl DeIdentifierConfig {
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn with_extra_sensitive_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_sensitive_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_redact_mode(mut self, redact_mode: bool) -> Self {
        self.redact_mode = redact_mode;
        self
    }
}

/// Configuration for a `VaultStore`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Seconds between background sweeps of expired vaults
    pub sweep_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
        }
    }
}

impl StoreConfig {
    /// Sweep interval, never shorter than one second
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[cfg(feature = "python")]
mod py {
    use pyo3::prelude::*;
    use pyo3::types::PyDict;

    use super::{DeIdentifierConfig, StoreConfig};

    impl DeIdentifierConfig {
        /// Extract configuration from Python dict
        pub fn from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<Self> {
            let mut config = Self::default();

            macro_rules! extract {
                ($field:ident) => {
                    if let Some(value) = dict.get_item(stringify!($field))? {
                        if !value.is_none() {
                            config.$field = value.extract()?;
                        }
                    }
                };
            }

            extract!(ttl_seconds);
            extract!(extra_sensitive_fields);
            extract!(redact_mode);
            extract!(redaction_text);

            Ok(config)
        }
    }

    impl StoreConfig {
        /// Extract configuration from Python dict
        pub fn from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<Self> {
            let mut config = Self::default();
            if let Some(value) = dict.get_item("sweep_interval_secs")? {
                if !value.is_none() {
                    config.sweep_interval_secs = value.extract()?;
                }
            }
            Ok(config)
        }
    }
}
