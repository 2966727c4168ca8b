// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for the privacy vault

use thiserror::Error;

/// Failures surfaced by vault lookups and re-identification
#[derive(Debug, Error)]
pub enum VaultError {
    /// No live vault is registered under this id (never existed, destroyed,
    /// or already swept)
    #[error("privacy vault \"{0}\" not found; it may have expired or been destroyed")]
    NotFound(String),

    /// The vault existed but its TTL had elapsed; it has now been removed
    #[error("privacy vault \"{0}\" has expired; de-identification map is no longer available")]
    Expired(String),

    #[error("failed to build token matcher: {0}")]
    Matcher(#[from] regex::Error),

    #[error("failed to start vault sweeper: {0}")]
    Sweeper(#[source] std::io::Error),
}

pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(feature = "python")]
impl From<VaultError> for pyo3::PyErr {
    fn from(error: VaultError) -> Self {
        pyo3::exceptions::PyValueError::new_err(error.to_string())
    }
}
