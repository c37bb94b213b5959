use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use trustsig::{AppConfig, GpgSigningMechanism, Result, TrustsigError};

/// Load the configuration, then apply the `--gpg` override.
pub fn load_config(config_path: Option<&Path>, gpg: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(config_path)?;
    if let Some(gpg) = gpg {
        config.engine.gpg_path = gpg.to_path_buf();
    }
    Ok(config)
}

/// Open `keyring` if given, else the default keyring.
pub fn open_keyring(keyring: Option<&Path>, config: &AppConfig) -> Result<GpgSigningMechanism> {
    match keyring {
        Some(path) => GpgSigningMechanism::open_persistent(path, config),
        None => GpgSigningMechanism::open_default(config),
    }
}

/// Read every key file and open a temporary keyring holding only them.
pub fn open_trusting(key_files: &[PathBuf], config: &AppConfig) -> Result<GpgSigningMechanism> {
    let mut blobs = Vec::new();
    for path in key_files {
        blobs.extend(read_file(path)?);
    }

    let (mechanism, fingerprints) = GpgSigningMechanism::open_ephemeral(&blobs, config)?;
    if fingerprints.is_empty() {
        if let Err(e) = mechanism.close() {
            tracing::warn!(error = %e, "failed to remove temporary keyring");
        }
        return Err(TrustsigError::Import {
            reason: "no usable public keys in the given key files".into(),
        });
    }
    tracing::info!(keys = fingerprints.len(), "trusting imported keys");
    Ok(mechanism)
}

/// Run `op` with `mechanism`, then close it.
pub fn with_mechanism<T>(
    mechanism: GpgSigningMechanism,
    op: impl FnOnce(&GpgSigningMechanism) -> Result<T>,
) -> Result<T> {
    let result = op(&mechanism);
    settle(result, mechanism.close())
}

/// Combine an operation's result with the outcome of closing its
/// mechanism.
///
/// A failed close never discards a successful result; it is logged and
/// the value is returned. The operation's own error wins over a close
/// error.
pub fn settle<T>(result: Result<T>, closed: Result<()>) -> Result<T> {
    match (result, closed) {
        (result, Ok(())) => result,
        (Ok(value), Err(e)) => {
            tracing::warn!(error = %e, "keyring cleanup failed after a successful operation");
            Ok(value)
        }
        (Err(e), Err(cleanup)) => {
            tracing::warn!(error = %cleanup, "keyring cleanup failed");
            Err(e)
        }
    }
}

/// Read `path`, or stdin for `-`.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return Ok(data);
    }
    read_file(Path::new(path))
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        TrustsigError::Io(io::Error::new(
            e.kind(),
            format!("Cannot read {}: {e}", path.display()),
        ))
    })
}

/// Write `data` to `path`, or raw to stdout when no path is given.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Cannot print as JSON: {e}. Write the content with --output instead."),
        )
    })?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn cleanup_failure() -> TrustsigError {
        TrustsigError::Cleanup {
            path: PathBuf::from("/tmp/trustsig-keyring-test"),
            reason: "Directory not empty".into(),
        }
    }

    #[test]
    fn failed_close_keeps_successful_result() {
        let settled = settle(Ok(b"content".to_vec()), Err(cleanup_failure()));
        assert_eq!(settled.unwrap(), b"content");
    }

    #[test]
    fn operation_error_wins_over_close_error() {
        let failed: Result<()> = Err(TrustsigError::Verification {
            reason: "signature has expired".into(),
        });
        let err = settle(failed, Err(cleanup_failure())).unwrap_err();
        assert!(matches!(err, TrustsigError::Verification { .. }));
    }

    #[test]
    fn clean_close_passes_result_through() {
        assert_eq!(settle(Ok(7), Ok(())).unwrap(), 7);

        let failed: Result<u8> = Err(TrustsigError::MalformedInput {
            reason: "empty input".into(),
        });
        let err = settle(failed, Ok(())).unwrap_err();
        assert!(matches!(err, TrustsigError::MalformedInput { .. }));
    }
}
