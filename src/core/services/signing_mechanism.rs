use crate::core::errors::{Result, TrustsigError};
use crate::core::models::decoded_message::SignatureState;
use crate::core::models::key_store::KeyStore;
use crate::core::models::packet_class::PacketClass;
use crate::core::models::signature_contents::{UntrustedContents, VerifiedContents};
use crate::core::services::packet_classifier::PacketClassifier;
use crate::core::traits::signing_engine::SigningEngine;

/// Signs, verifies and inspects signature blobs against one keyring.
///
/// The mechanism is bound to a single `KeyStore` for its whole life and
/// must be released with `close`. It is not meant to be shared between
/// threads running operations at the same time; build one per worker.
///
/// Constructors for the gpg-backed variants live in
/// `adapters::key_stores::gpg_keyring`.
pub struct SigningMechanism<E: SigningEngine> {
    engine: E,
    store: KeyStore,
}

impl<E: SigningEngine> SigningMechanism<E> {
    /// Bind an engine to the store it is rooted at.
    pub fn new(engine: E, store: KeyStore) -> Self {
        Self { engine, store }
    }

    /// The keyring this mechanism works against.
    pub fn key_store(&self) -> &KeyStore {
        &self.store
    }

    /// The engine backing this mechanism.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Import key material into the bound keyring.
    pub(crate) fn import_keys(&self, key_blob: &[u8]) -> Result<Vec<String>> {
        let identities = self.engine.import(key_blob)?;
        tracing::debug!(count = identities.len(), "imported keys");
        Ok(identities)
    }

    /// Sign `content` with the key identified by `fingerprint`.
    pub fn sign(&self, content: &[u8], fingerprint: &str) -> Result<Vec<u8>> {
        tracing::debug!(fingerprint, engine = self.engine.name(), "signing content");
        self.engine.sign(content, fingerprint)
    }

    /// Verify `signature` against the keys in the bound keyring.
    ///
    /// Succeeds only for a signed literal carrying exactly one good
    /// signature by a key present in the keyring. Every other outcome is
    /// a `Verification` error and no content is returned.
    pub fn verify(&self, signature: &[u8]) -> Result<VerifiedContents> {
        let class = self.classify(signature).map_err(Self::verification_failure)?;
        if !matches!(class, PacketClass::SignedLiteral { .. }) {
            return Err(TrustsigError::Verification {
                reason: format!("input is {}", class.describe()),
            });
        }

        let decoded = self
            .engine
            .decode(signature)
            .map_err(Self::verification_failure)?;

        let [check] = decoded.signatures.as_slice() else {
            return Err(TrustsigError::Verification {
                reason: format!(
                    "expected exactly one signature, found {}",
                    decoded.signatures.len()
                ),
            });
        };

        let reason = match check.state {
            SignatureState::Good => None,
            SignatureState::Bad => Some("signature does not match the signed data"),
            SignatureState::Expired => Some("signature has expired"),
            SignatureState::ExpiredKey => Some("signing key has expired"),
            SignatureState::RevokedKey => Some("signing key has been revoked"),
            SignatureState::MissingKey => Some("signing key is not in the keyring"),
            SignatureState::Error => Some("signature could not be checked"),
        };
        if let Some(reason) = reason {
            tracing::debug!(key_id = ?check.key_id, reason, "signature rejected");
            return Err(TrustsigError::Verification {
                reason: reason.into(),
            });
        }

        let Some(fingerprint) = check.fingerprint.clone() else {
            return Err(TrustsigError::Verification {
                reason: "engine did not report the signing key fingerprint".into(),
            });
        };
        if !decoded.literal_seen {
            return Err(TrustsigError::Verification {
                reason: "no signed content found".into(),
            });
        }

        tracing::info!(%fingerprint, "signature verified");
        Ok(VerifiedContents {
            content: decoded.plaintext,
            fingerprint,
        })
    }

    /// Extract the content and first signer's key ID from `signature`
    /// without checking the signature or consulting the keyring's trust.
    ///
    /// The result is a claim, not a proof. Use it to choose which key to
    /// verify against, never as verified data.
    pub fn untrusted_signature_contents(&self, signature: &[u8]) -> Result<UntrustedContents> {
        if signature.is_empty() {
            return Err(TrustsigError::MalformedInput {
                reason: "empty input".into(),
            });
        }

        let class = self.classify(signature)?;
        let short_key_id = match &class {
            PacketClass::SignedLiteral { .. } => class
                .first_signer()
                .map(str::to_owned)
                .ok_or_else(|| TrustsigError::MalformedInput {
                    reason: "signature does not name its signing key".into(),
                })?,
            PacketClass::BareLiteral | PacketClass::Encrypted => {
                return Err(TrustsigError::NotASignature {
                    found: class.describe().into(),
                });
            }
            PacketClass::Unparseable => {
                return Err(TrustsigError::MalformedInput {
                    reason: class.describe().into(),
                });
            }
        };

        let decoded = self.engine.decode(signature)?;
        if !decoded.literal_seen {
            return Err(TrustsigError::MalformedInput {
                reason: "no literal data could be recovered".into(),
            });
        }

        Ok(UntrustedContents {
            content: decoded.plaintext,
            short_key_id,
        })
    }

    /// Release the engine and tear down the keyring.
    ///
    /// Consumes the mechanism, so it runs exactly once. For an ephemeral
    /// keyring the directory no longer exists when this returns `Ok`.
    pub fn close(self) -> Result<()> {
        tracing::debug!(home = %self.engine.home().display(), "closing signing mechanism");
        self.engine.release();
        self.store.close()
    }

    fn classify(&self, blob: &[u8]) -> Result<PacketClass> {
        if blob.is_empty() {
            return Ok(PacketClass::Unparseable);
        }
        let listing = self.engine.list_packets(blob)?;
        let class = PacketClassifier.classify(&listing);
        tracing::debug!(?class, "classified packets");
        Ok(class)
    }

    fn verification_failure(err: TrustsigError) -> TrustsigError {
        match err {
            TrustsigError::Verification { .. } => err,
            other => TrustsigError::Verification {
                reason: other.to_string(),
            },
        }
    }
}
