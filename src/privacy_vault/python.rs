// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// PyO3 bindings for the privacy vault

use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use pyo3::IntoPyObjectExt;
use std::sync::Arc;

use super::config::{DeIdentifierConfig, StoreConfig};
use super::deidentifier::DeIdentifier;
use super::store::VaultStore;
use super::value::Value;

/// Privacy vault exposed to Python
///
/// Owns one `VaultStore` (and its sweeper); create one per process.
///
/// # Example (Python)
/// ```python
/// from privacy_vault import PrivacyVaultRust
///
/// vault = PrivacyVaultRust({"ttl_seconds": 1800}, {"sweep_interval_secs": 60})
/// result = vault.de_identify(xero_contacts)
/// # result["sanitized_data"] is safe to send for analysis
///
/// report = vault.re_identify(analysis, result["vault_id"])
/// ```
#[pyclass]
pub struct PrivacyVaultRust {
    engine: DeIdentifier,
}

#[pymethods]
impl PrivacyVaultRust {
    /// Create a vault
    ///
    /// # Configuration Keys
    /// * `ttl_seconds` (int): vault lifetime, default 1800
    /// * `extra_sensitive_fields` (list[str]): extra field names treated as names
    /// * `redact_mode` (bool): replace with `redaction_text` instead of tokens
    /// * `redaction_text` (str): default "[REDACTED]"
    /// * `sweep_interval_secs` (int, store config): default 60
    #[new]
    #[pyo3(signature = (config=None, store_config=None))]
    pub fn new(
        config: Option<&Bound<'_, PyDict>>,
        store_config: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<Self> {
        let config = match config {
            Some(dict) => DeIdentifierConfig::from_py_dict(dict)?,
            None => DeIdentifierConfig::default(),
        };
        let store_config = match store_config {
            Some(dict) => StoreConfig::from_py_dict(dict)?,
            None => StoreConfig::default(),
        };

        let store = Arc::new(VaultStore::new(&store_config)?);
        Ok(Self {
            engine: DeIdentifier::new(config, store),
        })
    }

    /// De-identify nested data
    ///
    /// # Returns
    /// `{"vault_id": str, "sanitized_data": Any, "field_counts": dict, "total_tokenized": int}`
    pub fn de_identify(&self, py: Python<'_>, data: &Bound<'_, PyAny>) -> PyResult<Py<PyAny>> {
        let data = py_to_value(data)?;
        let result = py.detach(|| self.engine.de_identify(&data));

        let counts = PyDict::new(py);
        for (category, count) in &result.field_counts {
            counts.set_item(category.as_str(), *count)?;
        }

        let out = PyDict::new(py);
        out.set_item("vault_id", &result.vault_id)?;
        out.set_item("sanitized_data", value_to_py(py, &result.sanitized_data)?)?;
        out.set_item("field_counts", counts)?;
        out.set_item("total_tokenized", result.total_tokenized)?;
        Ok(out.into_any().unbind())
    }

    /// Swap tokens in `analysis_output` back to original values
    ///
    /// Raises `ValueError` if the vault is missing or expired.
    #[pyo3(signature = (analysis_output, vault_id, destroy_after=true))]
    pub fn re_identify(
        &self,
        py: Python<'_>,
        analysis_output: &Bound<'_, PyAny>,
        vault_id: &str,
        destroy_after: bool,
    ) -> PyResult<Py<PyAny>> {
        let output = py_to_value(analysis_output)?;
        let restored = py.detach(|| self.engine.re_identify(&output, vault_id, destroy_after))?;
        Ok(value_to_py(py, &restored)?.unbind())
    }

    pub fn destroy_vault(&self, vault_id: &str) -> bool {
        self.engine.destroy_vault(vault_id)
    }

    /// `{"active_vaults": int, "total_tokens_stored": int, "oldest_vault_age_seconds": float | None}`
    pub fn stats(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let stats = self.engine.store().stats();
        let out = PyDict::new(py);
        out.set_item("active_vaults", stats.active_vaults)?;
        out.set_item("total_tokens_stored", stats.total_tokens_stored)?;
        out.set_item("oldest_vault_age_seconds", stats.oldest_vault_age_seconds)?;
        Ok(out.into_any().unbind())
    }
}

/// Convert a Python object into a `Value`
///
/// Objects outside the JSON model (datetimes, decimals, ...) become their
/// `str()` form.
fn py_to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }

    // bool is a subclass of int, so it must be checked first
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Value::Bool(b.is_true()));
    }

    if obj.downcast::<PyInt>().is_ok() {
        if let Ok(n) = obj.extract::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        if let Ok(n) = obj.extract::<u64>() {
            return Ok(Value::Number(n.into()));
        }
        return Ok(Value::String(obj.str()?.to_string()));
    }

    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Ok(serde_json::Number::from_f64(f.value())
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }

    if let Ok(s) = obj.downcast::<PyString>() {
        return Ok(Value::String(s.to_cow()?.into_owned()));
    }

    if let Ok(dict) = obj.downcast::<PyDict>() {
        let mut map = indexmap::IndexMap::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            let key = match key.extract::<String>() {
                Ok(key) => key,
                Err(_) => key.str()?.to_string(),
            };
            map.insert(key, py_to_value(&value)?);
        }
        return Ok(Value::Map(map));
    }

    if let Ok(list) = obj.downcast::<PyList>() {
        return list
            .iter()
            .map(|item| py_to_value(&item))
            .collect::<PyResult<Vec<_>>>()
            .map(Value::Sequence);
    }

    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        return tuple
            .iter()
            .map(|item| py_to_value(&item))
            .collect::<PyResult<Vec<_>>>()
            .map(Value::Sequence);
    }

    Ok(Value::String(obj.str()?.to_string()))
}

/// Convert a `Value` into a Python object
fn value_to_py<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    match value {
        Value::Null => Ok(py.None().into_bound(py)),
        Value::Bool(b) => b.into_bound_py_any(py),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into_bound_py_any(py)
            } else if let Some(u) = n.as_u64() {
                u.into_bound_py_any(py)
            } else {
                n.as_f64().unwrap_or(f64::NAN).into_bound_py_any(py)
            }
        }
        Value::String(s) => s.as_str().into_bound_py_any(py),
        Value::Sequence(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(value_to_py(py, item)?)?;
            }
            Ok(list.into_any())
        }
        Value::Map(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, value_to_py(py, item)?)?;
            }
            Ok(dict.into_any())
        }
    }
}
