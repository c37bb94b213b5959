mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::commands::keyring_helpers;
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let result = keyring_helpers::load_config(args.config.as_deref(), args.gpg.as_deref())
        .and_then(|config| match &args.command {
            Commands::Sign {
                file,
                key,
                keyring,
                output,
            } => cli::commands::sign::execute(
                file,
                key,
                keyring.as_deref(),
                output.as_deref(),
                &config,
            ),
            Commands::Verify {
                signature,
                keyring,
                public_keys,
                output,
                json,
            } => cli::commands::verify::execute(
                signature,
                keyring.as_deref(),
                public_keys,
                output.as_deref(),
                *json,
                &config,
            ),
            Commands::Inspect {
                signature,
                output,
                json,
            } => cli::commands::inspect::execute(signature, output.as_deref(), *json, &config),
            Commands::Fingerprints { key_file } => {
                cli::commands::fingerprints::execute(key_file, &config)
            }
            Commands::Detect { file, decompress } => {
                cli::commands::detect::execute(file, decompress.as_deref())
            }
        });

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Log to stderr so that content written to stdout stays clean.
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "trustsig=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
