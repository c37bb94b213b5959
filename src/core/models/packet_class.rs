/// Shape of an OpenPGP packet sequence, as far as signing is concerned.
///
/// Produced by the packet classifier from the engine's packet listing.
/// Only `SignedLiteral` can ever yield content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketClass {
    /// One or more signature packets over a literal data packet.
    ///
    /// `signer_key_ids` keeps the order the packets appear in; callers that
    /// need a single signer use the first entry.
    SignedLiteral { signer_key_ids: Vec<String> },
    /// A literal data packet with no signature.
    BareLiteral,
    /// Encrypted data, which is never a signature.
    Encrypted,
    /// Nothing usable could be recognized.
    Unparseable,
}

impl PacketClass {
    /// Key ID of the first signer, if this is a signed literal.
    pub fn first_signer(&self) -> Option<&str> {
        match self {
            PacketClass::SignedLiteral { signer_key_ids } => {
                signer_key_ids.first().map(String::as_str)
            }
            _ => None,
        }
    }

    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            PacketClass::SignedLiteral { .. } => "signed literal data",
            PacketClass::BareLiteral => "a literal data packet without signature",
            PacketClass::Encrypted => "encrypted data",
            PacketClass::Unparseable => "no recognizable OpenPGP packets",
        }
    }
}
