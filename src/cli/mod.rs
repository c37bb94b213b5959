pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sign, verify and inspect OpenPGP signature blobs.
#[derive(Parser, Debug)]
#[command(name = "trustsig", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the gpg binary (overrides the config file)
    #[arg(long, global = true, env = "TRUSTSIG_GPG")]
    pub gpg: Option<PathBuf>,

    /// Verbose output (engine invocations are logged to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign a file with a key from a keyring
    Sign {
        /// File to sign ("-" for stdin)
        file: String,
        /// Fingerprint of the signing key
        #[arg(long, short)]
        key: String,
        /// Keyring directory (default: $GNUPGHOME or ~/.gnupg)
        #[arg(long)]
        keyring: Option<PathBuf>,
        /// Where to write the signature (default: <file>.sig, stdout for "-")
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Verify a signature and recover the signed content
    Verify {
        /// Signature file
        signature: PathBuf,
        /// Keyring directory to verify against
        #[arg(long, conflicts_with = "public_keys")]
        keyring: Option<PathBuf>,
        /// Trust only these public key files (repeatable)
        #[arg(long = "public-key")]
        public_keys: Vec<PathBuf>,
        /// Write the verified content to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the content and signer key ID of a signature WITHOUT verifying it
    Inspect {
        /// Signature file
        signature: PathBuf,
        /// Write the unverified content to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the fingerprints of the keys in a key file
    Fingerprints {
        /// Key file (binary or armored)
        key_file: PathBuf,
    },

    /// Detect the compression format of a file
    Detect {
        /// File to inspect
        file: PathBuf,
        /// Write the decompressed content to this file
        #[arg(long)]
        decompress: Option<PathBuf>,
    },
}
