use std::path::{Path, PathBuf};

use trustsig::{AppConfig, Result, VerifiedContents};

use crate::cli::commands::keyring_helpers;
use crate::cli::output;

/// Execute the `trustsig verify` command.
///
/// With `--public-key`, only the given keys are trusted: they are
/// imported into a temporary keyring that is removed afterwards.
/// Otherwise the signature is checked against `keyring` or the default
/// keyring. Content is only ever printed after a good signature.
pub fn execute(
    signature: &Path,
    keyring: Option<&Path>,
    public_keys: &[PathBuf],
    output_path: Option<&Path>,
    json: bool,
    config: &AppConfig,
) -> Result<()> {
    let blob = keyring_helpers::read_file(signature)?;

    let mechanism = if public_keys.is_empty() {
        keyring_helpers::open_keyring(keyring, config)?
    } else {
        keyring_helpers::open_trusting(public_keys, config)?
    };
    let verified = keyring_helpers::with_mechanism(mechanism, |m| m.verify(&blob))?;

    report(&verified, output_path, json)
}

fn report(verified: &VerifiedContents, output_path: Option<&Path>, json: bool) -> Result<()> {
    if json {
        return keyring_helpers::print_json(verified);
    }

    match output_path {
        Some(path) => {
            keyring_helpers::write_output(Some(path), &verified.content)?;
            output::success(&format!("Good signature from {}", verified.fingerprint));
            println!("  Content written to {}", path.display());
        }
        None => {
            output::success_stderr(&format!("Good signature from {}", verified.fingerprint));
            keyring_helpers::write_output(None, &verified.content)?;
        }
    }
    Ok(())
}
