use std::path::Path;

use trustsig::{AppConfig, GpgSigningMechanism, Result};

use crate::cli::commands::keyring_helpers;
use crate::cli::output;

/// Execute the `trustsig fingerprints` command.
pub fn execute(key_file: &Path, config: &AppConfig) -> Result<()> {
    let blob = keyring_helpers::read_file(key_file)?;
    let (mechanism, fingerprints) = GpgSigningMechanism::open_ephemeral(&blob, config)?;
    let fingerprints = keyring_helpers::settle(Ok(fingerprints), mechanism.close())?;

    if fingerprints.is_empty() {
        output::warning(&format!("No keys found in {}", key_file.display()));
        return Ok(());
    }
    for fingerprint in &fingerprints {
        println!("{fingerprint}");
    }
    Ok(())
}
