use std::path::Path;

use crate::adapters::engine::gpg_engine::GpgEngine;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::key_store::KeyStore;
use crate::core::services::signing_mechanism::SigningMechanism;

/// Signing mechanism backed by the system gpg.
pub type GpgSigningMechanism = SigningMechanism<GpgEngine>;

impl SigningMechanism<GpgEngine> {
    /// Open a mechanism on an existing keyring directory owned by the
    /// caller. `close` never deletes anything in it.
    pub fn open_persistent(path: &Path, config: &AppConfig) -> Result<Self> {
        let store = KeyStore::persistent(path)?;
        let engine = GpgEngine::open(store.root(), &config.engine)?;
        tracing::info!(keyring = %path.display(), "opened persistent keyring");
        Ok(Self::new(engine, store))
    }

    /// Open a mechanism on the user's default keyring.
    pub fn open_default(config: &AppConfig) -> Result<Self> {
        let path = config.default_keyring()?;
        Self::open_persistent(&path, config)
    }

    /// Open a mechanism on a fresh temporary keyring seeded with
    /// `key_blobs`, returning the fingerprints of the imported keys in
    /// input order.
    ///
    /// The keyring is invisible to other callers and is deleted by
    /// `close`. A blob containing no usable keys yields an empty list.
    /// If anything fails, whatever was already created is removed before
    /// the error is returned.
    pub fn open_ephemeral(key_blobs: &[u8], config: &AppConfig) -> Result<(Self, Vec<String>)> {
        let store = KeyStore::ephemeral(&config.ephemeral)?;

        let engine = match GpgEngine::open(store.root(), &config.engine) {
            Ok(engine) => engine.with_owned_agent(),
            Err(e) => {
                if let Err(cleanup) = store.close() {
                    tracing::warn!(error = %cleanup, "failed to remove keyring after init failure");
                }
                return Err(e);
            }
        };
        let mechanism = Self::new(engine, store);

        if key_blobs.is_empty() {
            return Ok((mechanism, Vec::new()));
        }

        match mechanism.import_keys(key_blobs) {
            Ok(identities) => Ok((mechanism, identities)),
            Err(e) => {
                if let Err(cleanup) = mechanism.close() {
                    tracing::warn!(error = %cleanup, "failed to remove keyring after import failure");
                }
                Err(e)
            }
        }
    }
}
