use serde::Serialize;

/// Content recovered from a signature that verified against a key in
/// the bound keyring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedContents {
    #[serde(serialize_with = "utf8_text")]
    pub content: Vec<u8>,
    /// Full fingerprint of the key that made the signature.
    pub fingerprint: String,
}

/// Content claimed by a signature, parsed without any trust check.
///
/// Nothing in here has been authenticated. It exists so that policy code
/// can decide which key to expect before verifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntrustedContents {
    #[serde(serialize_with = "utf8_text")]
    pub content: Vec<u8>,
    /// 16 hex digit key ID of the first signer.
    pub short_key_id: String,
}

/// Content is rendered as text. Bytes that are not UTF-8 fail the
/// serialization instead of being replaced.
fn utf8_text<S: serde::Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        serde::ser::Error::custom(format!("content is not valid UTF-8 text ({e})"))
    })?;
    s.serialize_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_renders_content_as_text() {
        let verified = VerifiedContents {
            content: b"hello\n".to_vec(),
            fingerprint: "08CD26E446E2E95249B7A405E932F44B23E8DD43".into(),
        };
        let json = serde_json::to_string(&verified).unwrap();
        assert_eq!(
            json,
            r#"{"content":"hello\n","fingerprint":"08CD26E446E2E95249B7A405E932F44B23E8DD43"}"#
        );
    }

    #[test]
    fn json_refuses_binary_content() {
        let untrusted = UntrustedContents {
            content: vec![0x00, 0xFF, 0xFE, b'x'],
            short_key_id: "E932F44B23E8DD43".into(),
        };
        let err = serde_json::to_string(&untrusted).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
