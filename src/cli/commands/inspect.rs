use std::path::Path;

use trustsig::{AppConfig, GpgSigningMechanism, Result};

use crate::cli::commands::keyring_helpers;
use crate::cli::output;

/// Execute the `trustsig inspect` command.
///
/// Parses the signature in an empty temporary keyring, so no key is
/// trusted and nothing is verified. The output says so.
pub fn execute(
    signature: &Path,
    output_path: Option<&Path>,
    json: bool,
    config: &AppConfig,
) -> Result<()> {
    let blob = keyring_helpers::read_file(signature)?;
    let (mechanism, _) = GpgSigningMechanism::open_ephemeral(&[], config)?;
    let contents =
        keyring_helpers::with_mechanism(mechanism, |m| m.untrusted_signature_contents(&blob))?;

    if json {
        return keyring_helpers::print_json(&contents);
    }

    let label = format!(
        "UNVERIFIED: the signature has not been checked (claimed signer key ID {})",
        contents.short_key_id
    );
    match output_path {
        Some(path) => {
            keyring_helpers::write_output(Some(path), &contents.content)?;
            output::warning(&label);
            println!("  Unverified content written to {}", path.display());
        }
        None => {
            output::warning_stderr(&label);
            keyring_helpers::write_output(None, &contents.content)?;
        }
    }
    Ok(())
}
