// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Concurrent registry of live session vaults with a background expiry sweep

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::StoreConfig;
use super::error::{VaultError, VaultResult};
use super::vault::SessionVault;

const SWEEPER_THREAD_NAME: &str = "privacy-vault-sweeper";

/// Aggregate statistics for operational dashboards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaultStats {
    pub active_vaults: usize,
    pub total_tokens_stored: usize,
    pub oldest_vault_age_seconds: Option<f64>,
}

/// Map of vault id -> vault, shared with the sweeper thread
#[derive(Debug, Default)]
struct VaultRegistry {
    vaults: RwLock<HashMap<String, Arc<SessionVault>>>,
}

impl VaultRegistry {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<SessionVault>>> {
        match self.vaults.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<SessionVault>>> {
        match self.vaults.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut vaults = self.write();
        let before = vaults.len();
        vaults.retain(|_, vault| !vault.is_expired_at(now));
        before - vaults.len()
    }
}

struct Sweeper {
    stop_tx: Sender<()>,
    worker: JoinHandle<()>,
}

/// Process-wide store of live session vaults
///
/// Owns every registered `SessionVault`. A background sweeper thread is
/// started at construction and removes expired vaults every
/// `sweep_interval`; it is stopped by `shutdown` or on drop.
///
/// Expiry is enforced lazily: a vault may outlive its nominal expiry until
/// the next sweep or the next `checkout`.
pub struct VaultStore {
    registry: Arc<VaultRegistry>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl VaultStore {
    /// Create an empty store and start its sweeper
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Sweeper` when the sweeper thread cannot be spawned.
    pub fn new(config: &StoreConfig) -> VaultResult<Self> {
        let registry = Arc::new(VaultRegistry::default());
        let sweeper = spawn_sweeper(Arc::clone(&registry), config.sweep_interval())?;

        Ok(Self {
            registry,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    /// Add a fully built vault; this is the commit point of `de_identify`
    pub fn register(&self, vault: SessionVault) -> Arc<SessionVault> {
        let vault = Arc::new(vault);
        self.registry
            .write()
            .insert(vault.vault_id().to_string(), Arc::clone(&vault));
        vault
    }

    /// Look up a vault without checking expiry
    pub fn get(&self, vault_id: &str) -> Option<Arc<SessionVault>> {
        self.registry.read().get(vault_id).cloned()
    }

    /// Remove a vault, returning whether it was present
    pub fn remove(&self, vault_id: &str) -> bool {
        self.registry.write().remove(vault_id).is_some()
    }

    /// Explicitly destroy a vault
    pub fn destroy(&self, vault_id: &str) -> bool {
        let removed = self.remove(vault_id);
        if removed {
            debug!(vault_id, "Destroyed privacy vault");
        }
        removed
    }

    /// Look up a live vault for re-identification
    ///
    /// An expired vault is removed as a side effect, so the next lookup
    /// reports `NotFound`. Among racing callers only the one that removes
    /// it sees `Expired`.
    ///
    /// # Errors
    ///
    /// `VaultError::NotFound` if no vault is registered under `vault_id`,
    /// `VaultError::Expired` if it was registered but its TTL has elapsed.
    pub fn checkout(&self, vault_id: &str) -> VaultResult<Arc<SessionVault>> {
        let vault = self
            .get(vault_id)
            .ok_or_else(|| VaultError::NotFound(vault_id.to_string()))?;

        if !vault.is_expired() {
            return Ok(vault);
        }

        match self.registry.write().remove(vault_id) {
            Some(evicted) => Err(expired(&evicted)),
            None => Err(VaultError::NotFound(vault_id.to_string())),
        }
    }

    /// Remove a live vault and hand it to the caller
    ///
    /// Removal happens under one write lock, so of several callers racing
    /// on the same id exactly one receives the vault (or `Expired`); the
    /// rest get `NotFound`.
    ///
    /// # Errors
    ///
    /// Same as [`VaultStore::checkout`].
    pub fn take(&self, vault_id: &str) -> VaultResult<Arc<SessionVault>> {
        let vault = self
            .registry
            .write()
            .remove(vault_id)
            .ok_or_else(|| VaultError::NotFound(vault_id.to_string()))?;

        if vault.is_expired() {
            return Err(expired(&vault));
        }

        Ok(vault)
    }

    /// Remove every expired vault now, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        self.registry.sweep_expired_at(Utc::now())
    }

    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    pub fn stats(&self) -> VaultStats {
        let now = Utc::now();
        let vaults = self.registry.read();

        let total_tokens_stored = vaults.values().map(|vault| vault.len()).sum();
        let oldest_vault_age_seconds = vaults
            .values()
            .map(|vault| vault.created_at())
            .min()
            .map(|created_at| (now - created_at).num_milliseconds().max(0) as f64 / 1000.0);

        VaultStats {
            active_vaults: vaults.len(),
            total_tokens_stored,
            oldest_vault_age_seconds,
        }
    }

    /// Stop the sweeper and wait for it to exit. Idempotent.
    pub fn shutdown(&self) {
        let sweeper = lock_or_recover(&self.sweeper).take();
        let Some(Sweeper { stop_tx, worker }) = sweeper else {
            return;
        };

        // The worker also exits when the channel disconnects
        let _ = stop_tx.send(());
        drop(stop_tx);

        if let Err(error) = worker.join() {
            warn!(?error, "Privacy vault sweeper panicked during shutdown");
        }
    }
}

impl Drop for VaultStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultStore")
            .field("active_vaults", &self.len())
            .finish_non_exhaustive()
    }
}

fn spawn_sweeper(registry: Arc<VaultRegistry>, interval: Duration) -> VaultResult<Sweeper> {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let worker = thread::Builder::new()
        .name(SWEEPER_THREAD_NAME.to_owned())
        .spawn(move || {
            info!(interval_secs = interval.as_secs(), "Privacy vault sweeper started");
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let removed = registry.sweep_expired_at(Utc::now());
                        if removed > 0 {
                            debug!(removed, "Privacy vault cleanup: removed expired vault(s)");
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("Privacy vault sweeper stopped");
        })
        .map_err(VaultError::Sweeper)?;

    Ok(Sweeper { stop_tx, worker })
}

fn expired(vault: &SessionVault) -> VaultError {
    warn!(
        vault_id = vault.vault_id(),
        expired_at = %vault.expires_at().to_rfc3339(),
        "Privacy vault expired before re-identification"
    );
    VaultError::Expired(vault.vault_id().to_string())
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
