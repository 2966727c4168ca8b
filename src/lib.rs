// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Privacy vault for financial analysis payloads
// Optional PyO3 bindings behind the `python` feature

pub mod privacy_vault;

pub use privacy_vault::{
    re_identify, DeIdentificationResult, DeIdentifier, DeIdentifierConfig, FieldClassifier,
    FieldCounts, SensitivityCategory, SessionVault, StoreConfig, TokenReplacer, Value, VaultEntry,
    VaultError, VaultResult, VaultStats, VaultStore,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module: privacy_vault
///
/// Shields names, addresses, contact details and account numbers in
/// accounting records before analysis, and restores them afterwards.
///
/// # Examples
///
/// ```python
/// from privacy_vault import PrivacyVaultRust
///
/// vault = PrivacyVaultRust({"ttl_seconds": 1800})
///
/// result = vault.de_identify([{"Name": "Acme Pty Ltd", "AccountCode": "200"}])
/// print(result["sanitized_data"])  # [{"Name": "ENTITY_001", "AccountCode": "200"}]
///
/// restored = vault.re_identify("ENTITY_001 is overdue", result["vault_id"])
/// print(restored)  # "Acme Pty Ltd is overdue"
/// ```
#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "privacy_vault")]
fn privacy_vault_rust(m: &Bound<'_, pyo3::types::PyModule>) -> PyResult<()> {
    m.add_class::<privacy_vault::PrivacyVaultRust>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "Reversible tokenization of sensitive financial and personal fields",
    )?;

    Ok(())
}
