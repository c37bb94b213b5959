use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::decoded_message::DecodedMessage;

/// Port for the external OpenPGP engine.
///
/// Implementations live in `adapters::engine` (e.g. `GpgEngine`). The core
/// only depends on this trait, never on a concrete engine, and never
/// performs OpenPGP cryptography itself.
pub trait SigningEngine: Send {
    /// Keyring directory this engine is rooted at.
    fn home(&self) -> &Path;

    /// Import key material, returning the fingerprints of the imported
    /// keys in input order. Zero importable keys is not an error.
    fn import(&self, key_blob: &[u8]) -> Result<Vec<String>>;

    /// Produce a signed-literal message over `content` with the key
    /// matching `fingerprint`.
    fn sign(&self, content: &[u8], fingerprint: &str) -> Result<Vec<u8>>;

    /// Decode a message, recovering literal data and the engine's
    /// per-signature verdicts.
    fn decode(&self, message: &[u8]) -> Result<DecodedMessage>;

    /// Human-readable packet listing of `blob`, in the engine's format.
    fn list_packets(&self, blob: &[u8]) -> Result<String>;

    /// Release engine-side resources tied to this keyring.
    fn release(&self);

    /// Human-readable name of this engine (e.g. "gpg").
    fn name(&self) -> &str;
}
