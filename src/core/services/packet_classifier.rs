use std::sync::LazyLock;

use regex::Regex;

use crate::core::models::packet_class::PacketClass;

/// Header line of one packet in a listing, e.g.
/// `:onepass_sig packet: keyid 3F2C58E6DA7A5E0B`.
static PACKET_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:(?P<name>[A-Za-z0-9_ ]+?) packet:(?P<rest>.*)$").expect("valid regex")
});

static KEY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bkeyid (?P<id>[0-9A-Fa-f]{16})\b").expect("valid regex"));

const ENCRYPTED_PACKETS: &[&str] = &[
    "pubkey enc",
    "symkey enc",
    "encrypted data",
    "aead encrypted",
    "encrypted",
];

const KEY_PACKETS: &[&str] = &["public key", "public sub key", "secret key", "secret sub key"];

/// One recognized packet from a listing. Only the kinds that matter for
/// classification are distinguished.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ListedPacket {
    OnePassSignature(Option<String>),
    Signature(Option<String>),
    Literal,
    Encrypted,
    Key,
    Other,
}

/// Classifies an engine packet listing into the shapes the signing
/// mechanism cares about.
///
/// Shared by verification (which refuses anything but a signed literal
/// before asking the engine for a verdict) and untrusted extraction
/// (which needs the first signer's key ID).
pub struct PacketClassifier;

impl PacketClassifier {
    /// Classify the text produced by the engine's packet listing.
    ///
    /// Packets nested inside compressed data are listed inline by the
    /// engine, so they are treated like top-level packets here.
    pub fn classify(&self, listing: &str) -> PacketClass {
        let packets: Vec<ListedPacket> = listing.lines().filter_map(Self::parse_header).collect();

        if packets.is_empty() {
            return PacketClass::Unparseable;
        }

        if packets.contains(&ListedPacket::Encrypted) {
            return PacketClass::Encrypted;
        }

        if packets.contains(&ListedPacket::Key) {
            return PacketClass::Unparseable;
        }

        // Only the first message counts: its literal must be preceded by
        // the packets that sign it, and it must be the only literal.
        let Some(literal_at) = packets.iter().position(|p| *p == ListedPacket::Literal) else {
            return PacketClass::Unparseable;
        };
        let signing = &packets[..literal_at];
        let one_pass: Vec<&Option<String>> = signing
            .iter()
            .filter_map(|p| match p {
                ListedPacket::OnePassSignature(id) => Some(id),
                _ => None,
            })
            .collect();
        let signatures: Vec<&Option<String>> = signing
            .iter()
            .filter_map(|p| match p {
                ListedPacket::Signature(id) => Some(id),
                _ => None,
            })
            .collect();

        if one_pass.is_empty() && signatures.is_empty() {
            return PacketClass::BareLiteral;
        }

        let literals = packets
            .iter()
            .filter(|p| **p == ListedPacket::Literal)
            .count();
        if literals > 1 {
            tracing::debug!(literals, "more than one literal packet");
            return PacketClass::Unparseable;
        }

        // One-pass packets name the signers in order; old-style messages
        // only carry full signature packets ahead of the literal.
        let source = if one_pass.is_empty() {
            signatures
        } else {
            one_pass
        };
        let signer_key_ids = source.into_iter().flatten().cloned().collect();
        PacketClass::SignedLiteral { signer_key_ids }
    }

    fn parse_header(line: &str) -> Option<ListedPacket> {
        let caps = PACKET_HEADER.captures(line.trim_end())?;
        let name = caps.name("name")?.as_str().trim();
        let rest = caps.name("rest").map_or("", |m| m.as_str());

        let packet = match name {
            "onepass_sig" => ListedPacket::OnePassSignature(Self::key_id(rest)),
            "signature" => ListedPacket::Signature(Self::key_id(rest)),
            "literal data" => ListedPacket::Literal,
            n if ENCRYPTED_PACKETS.contains(&n) => ListedPacket::Encrypted,
            n if KEY_PACKETS.contains(&n) => ListedPacket::Key,
            _ => ListedPacket::Other,
        };
        Some(packet)
    }

    fn key_id(rest: &str) -> Option<String> {
        KEY_ID
            .captures(rest)
            .and_then(|c| c.name("id"))
            .map(|m| m.as_str().to_ascii_uppercase())
    }
}
