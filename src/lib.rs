//! Sign, verify and inspect OpenPGP signature blobs.
//!
//! A [`SigningMechanism`] is bound to one keyring: either a persistent
//! directory owned by the caller, or an ephemeral one created from
//! in-memory key material and deleted on [`SigningMechanism::close`].
//! Cryptography is delegated to the system `gpg`.

pub mod adapters;
pub mod config;
pub mod core;

pub use crate::adapters::compression::detector::{Compression, detect_compression};
pub use crate::adapters::engine::gpg_engine::GpgEngine;
pub use crate::adapters::key_stores::gpg_keyring::GpgSigningMechanism;
pub use crate::config::app_config::AppConfig;
pub use crate::core::errors::{Result, TrustsigError};
pub use crate::core::models::signature_contents::{UntrustedContents, VerifiedContents};
pub use crate::core::services::signing_mechanism::SigningMechanism;
