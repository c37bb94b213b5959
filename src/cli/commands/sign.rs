use std::path::{Path, PathBuf};

use trustsig::{AppConfig, Result};

use crate::cli::commands::keyring_helpers;
use crate::cli::output;

/// Execute the `trustsig sign` command.
///
/// Signs `file` (stdin for `-`) with the secret key `key` from the
/// keyring and writes the signature blob. Without `--output` the blob
/// goes to `<file>.sig`, or to stdout when reading stdin.
pub fn execute(
    file: &str,
    key: &str,
    keyring: Option<&Path>,
    output_path: Option<&Path>,
    config: &AppConfig,
) -> Result<()> {
    let content = keyring_helpers::read_input(file)?;
    let mechanism = keyring_helpers::open_keyring(keyring, config)?;
    let signature = keyring_helpers::with_mechanism(mechanism, |m| m.sign(&content, key))?;

    let dest = match output_path {
        Some(path) => Some(path.to_path_buf()),
        None if file == "-" => None,
        None => Some(PathBuf::from(format!("{file}.sig"))),
    };

    keyring_helpers::write_output(dest.as_deref(), &signature)?;
    if let Some(dest) = dest {
        output::success(&format!("Signed {file} → {}", dest.display()));
        println!("  Key: {key}");
    }
    Ok(())
}
