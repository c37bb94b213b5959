use std::path::PathBuf;

/// All domain errors for trustsig.
///
/// Every failing operation returns one of these and nothing else: a
/// caller never receives signature content alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum TrustsigError {
    #[error(
        "Could not create a temporary keyring directory: {reason}\n\n  \
         Check that the temporary directory is writable, or set\n  \
         [ephemeral] parent_dir in the configuration file."
    )]
    DirectoryCreation { reason: String },

    #[error(
        "Signing engine could not be initialized for {home}: {reason}\n\n  \
         Solutions:\n    \
         → Check that gpg is installed: gpg --version\n    \
         → Check that the keyring directory exists and is readable\n    \
         → Point to another binary with --gpg or [engine] gpg_path"
    )]
    EngineInit { home: PathBuf, reason: String },

    #[error("Signing engine failed: {reason}")]
    Engine { reason: String },

    #[error("Key import failed: {reason}")]
    Import { reason: String },

    #[error(
        "Signing with key '{fingerprint}' failed: {reason}\n\n  \
         The secret key must be present in the keyring used for signing.\n  \
         List available keys with: gpg --homedir <keyring> --list-secret-keys"
    )]
    Signing { fingerprint: String, reason: String },

    #[error("Signature verification failed: {reason}")]
    Verification { reason: String },

    #[error("Input is not a signature: found {found}")]
    NotASignature { found: String },

    #[error("Malformed signature input: {reason}")]
    MalformedInput { reason: String },

    #[error(
        "Failed to remove temporary keyring {path}: {reason}\n\n  \
         Operations already performed with this keyring are unaffected.\n  \
         The directory may need to be removed manually."
    )]
    Cleanup { path: PathBuf, reason: String },

    #[error("Compression detection failed: {reason}")]
    Detection { reason: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TrustsigError>;
