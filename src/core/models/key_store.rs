use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::app_config::EphemeralSection;
use crate::core::errors::{Result, TrustsigError};

/// Directory holding the keyring a signing mechanism works against.
///
/// A persistent store belongs to the caller and is never deleted here.
/// An ephemeral store owns a freshly created temporary directory which
/// `close` removes. If an ephemeral store is dropped without `close`,
/// the directory is still removed, but any failure goes unreported.
#[derive(Debug)]
pub struct KeyStore {
    root: PathBuf,
    ephemeral: Option<TempDir>,
}

impl KeyStore {
    /// Bind to an existing keyring directory owned by the caller.
    pub fn persistent(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(TrustsigError::EngineInit {
                home: root.to_path_buf(),
                reason: "keyring directory does not exist".into(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            ephemeral: None,
        })
    }

    /// Create a new, empty, uniquely named keyring directory.
    ///
    /// The directory is created atomically with owner-only permissions,
    /// so concurrent processes can never share or pre-populate it.
    pub fn ephemeral(settings: &EphemeralSection) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&settings.prefix);

        let created = match &settings.parent_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        let dir = created.map_err(|e| TrustsigError::DirectoryCreation {
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %dir.path().display(), "created ephemeral keyring");
        Ok(Self {
            root: dir.path().to_path_buf(),
            ephemeral: Some(dir),
        })
    }

    /// Root directory of the keyring.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether this store is deleted on close.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral.is_some()
    }

    /// Tear the store down. Removes the directory tree of an ephemeral
    /// store; leaves a persistent one untouched.
    pub fn close(self) -> Result<()> {
        let Some(dir) = self.ephemeral else {
            return Ok(());
        };

        dir.close().map_err(|e| TrustsigError::Cleanup {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %self.root.display(), "removed ephemeral keyring");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(parent: &Path) -> EphemeralSection {
        EphemeralSection {
            prefix: "trustsig-test-".into(),
            parent_dir: Some(parent.to_path_buf()),
        }
    }

    #[test]
    fn ephemeral_store_is_created_empty() {
        let parent = tempfile::tempdir().unwrap();
        let store = KeyStore::ephemeral(&settings_in(parent.path())).unwrap();

        assert!(store.is_ephemeral());
        assert!(store.root().is_dir());
        assert!(store.root().starts_with(parent.path()));
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 0);
        let name = store.root().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("trustsig-test-"));
    }

    #[test]
    fn ephemeral_stores_never_collide() {
        let parent = tempfile::tempdir().unwrap();
        let a = KeyStore::ephemeral(&settings_in(parent.path())).unwrap();
        let b = KeyStore::ephemeral(&settings_in(parent.path())).unwrap();
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn closing_ephemeral_store_removes_tree() {
        let parent = tempfile::tempdir().unwrap();
        let store = KeyStore::ephemeral(&settings_in(parent.path())).unwrap();
        let root = store.root().to_path_buf();
        std::fs::create_dir(root.join("private-keys-v1.d")).unwrap();
        std::fs::write(root.join("pubring.kbx"), b"keys").unwrap();

        store.close().unwrap();

        let err = std::fs::symlink_metadata(&root).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn closing_persistent_store_keeps_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pubring.kbx"), b"keys").unwrap();

        let store = KeyStore::persistent(dir.path()).unwrap();
        assert!(!store.is_ephemeral());
        store.close().unwrap();

        assert!(dir.path().join("pubring.kbx").exists());
    }

    #[test]
    fn persistent_store_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = KeyStore::persistent(&missing).unwrap_err();
        assert!(matches!(err, TrustsigError::EngineInit { .. }));
        assert!(!missing.exists());
    }

    #[test]
    fn unwritable_parent_is_a_directory_creation_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EphemeralSection {
            prefix: "trustsig-test-".into(),
            parent_dir: Some(dir.path().join("does/not/exist")),
        };
        let err = KeyStore::ephemeral(&settings).unwrap_err();
        assert!(matches!(err, TrustsigError::DirectoryCreation { .. }));
    }
}
