/// Engine verdict for one signature found while decoding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureState {
    Good,
    Bad,
    Expired,
    ExpiredKey,
    RevokedKey,
    MissingKey,
    Error,
}

/// One signature as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub state: SignatureState,
    /// Fingerprint of the signing key, only reported once the engine
    /// could check the signature mathematically.
    pub fingerprint: Option<String>,
    /// Key ID (or fingerprint) named in the verdict line.
    pub key_id: Option<String>,
}

impl SignatureCheck {
    pub fn new(state: SignatureState) -> Self {
        Self {
            state,
            fingerprint: None,
            key_id: None,
        }
    }
}

/// Raw result of asking the engine to decode a message.
///
/// This is engine output, not a verdict: the signing mechanism decides
/// what counts as a valid signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Literal data recovered from the message.
    pub plaintext: Vec<u8>,
    /// Whether the engine reached a literal data packet at all.
    pub literal_seen: bool,
    /// Signatures in the order the engine reported them.
    pub signatures: Vec<SignatureCheck>,
}
