use crate::core::models::decoded_message::{SignatureCheck, SignatureState};

/// Prefix of machine-readable lines written to `--status-file`.
const STATUS_PREFIX: &str = "[GNUPG:] ";

/// `ERRSIG` return code meaning the public key is not in the keyring.
const ERRSIG_NO_PUBLIC_KEY: &str = "9";

/// Iterate over the `(keyword, arguments)` of every status line in `output`,
/// skipping human-oriented diagnostics interleaved on the same stream.
fn status_lines(output: &str) -> impl Iterator<Item = (&str, Vec<&str>)> {
    output.lines().filter_map(|line| {
        let rest = line.strip_prefix(STATUS_PREFIX)?;
        let mut fields = rest.split_whitespace();
        let keyword = fields.next()?;
        Some((keyword, fields.collect()))
    })
}

/// What gpg reported while importing keys.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Primary key fingerprints, one per successfully processed key.
    pub fingerprints: Vec<String>,
    /// Whether gpg got as far as reporting an import result.
    pub completed: bool,
}

pub fn parse_import(output: &str) -> ImportReport {
    let mut report = ImportReport::default();
    for (keyword, args) in status_lines(output) {
        match keyword {
            "IMPORT_OK" => {
                if let Some(fingerprint) = args.get(1) {
                    report.fingerprints.push(fingerprint.to_ascii_uppercase());
                }
            }
            "IMPORT_PROBLEM" => {
                tracing::debug!(reason = ?args.first(), "key skipped by import");
            }
            "IMPORT_RES" | "NODATA" => report.completed = true,
            _ => {}
        }
    }
    report
}

/// What gpg reported while decoding a message.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub signatures: Vec<SignatureCheck>,
    pub literal_seen: bool,
}

/// Collect per-signature verdicts from a `--decrypt` status stream.
///
/// `NEWSIG` opens a record; the following verdict line fills it in and
/// `VALIDSIG` attaches the signing key fingerprint. A record with no
/// verdict stays in the `Error` state.
pub fn parse_decode(output: &str) -> DecodeReport {
    let mut report = DecodeReport::default();
    let mut awaiting_verdict = false;

    for (keyword, args) in status_lines(output) {
        let state = match keyword {
            "NEWSIG" => {
                report
                    .signatures
                    .push(SignatureCheck::new(SignatureState::Error));
                awaiting_verdict = true;
                continue;
            }
            "PLAINTEXT" => {
                report.literal_seen = true;
                continue;
            }
            "VALIDSIG" => {
                if let Some(last) = report.signatures.last_mut() {
                    last.fingerprint = args.first().map(|f| f.to_ascii_uppercase());
                }
                continue;
            }
            "GOODSIG" => SignatureState::Good,
            "BADSIG" => SignatureState::Bad,
            "EXPSIG" => SignatureState::Expired,
            "EXPKEYSIG" => SignatureState::ExpiredKey,
            "REVKEYSIG" => SignatureState::RevokedKey,
            "ERRSIG" if args.get(5) == Some(&ERRSIG_NO_PUBLIC_KEY) => SignatureState::MissingKey,
            "ERRSIG" => SignatureState::Error,
            _ => continue,
        };

        // Older engines emit verdicts without a preceding NEWSIG.
        if !awaiting_verdict {
            report
                .signatures
                .push(SignatureCheck::new(SignatureState::Error));
        }
        if let Some(last) = report.signatures.last_mut() {
            last.state = state;
            last.key_id = args.first().map(|k| k.to_ascii_uppercase());
        }
        awaiting_verdict = false;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const FPR: &str = "08CD26E446E2E95249B7A405E932F44B23E8DD43";

    #[test]
    fn ignores_diagnostics() {
        let output = "gpg: key E932F44B23E8DD43: public key imported\n\
                      [GNUPG:] IMPORT_OK 1 08CD26E446E2E95249B7A405E932F44B23E8DD43\n\
                      gpg: Total number processed: 1\n";
        let lines: Vec<_> = status_lines(output).collect();
        assert_eq!(lines, vec![("IMPORT_OK", vec!["1", FPR])]);
    }

    #[test]
    fn import_keeps_duplicates_in_order() {
        let output = "\
[GNUPG:] KEY_CONSIDERED 08CD26E446E2E95249B7A405E932F44B23E8DD43 0
[GNUPG:] IMPORTED E932F44B23E8DD43 Test Signer <signer@example.com>
[GNUPG:] IMPORT_OK 1 08CD26E446E2E95249B7A405E932F44B23E8DD43
[GNUPG:] KEY_CONSIDERED 08CD26E446E2E95249B7A405E932F44B23E8DD43 0
[GNUPG:] IMPORT_OK 0 08CD26E446E2E95249B7A405E932F44B23E8DD43
[GNUPG:] IMPORT_RES 2 0 1 0 1 0 0 0 0 0 0 0 0 0 0
";
        let report = parse_import(output);
        assert_eq!(report.fingerprints, vec![FPR, FPR]);
        assert!(report.completed);
    }

    #[test]
    fn import_of_garbage_completes_with_nothing() {
        let output = "gpg: no valid OpenPGP data found.\n\
                      [GNUPG:] NODATA 1\n\
                      [GNUPG:] IMPORT_RES 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n";
        let report = parse_import(output);
        assert!(report.fingerprints.is_empty());
        assert!(report.completed);
    }

    #[test]
    fn import_skips_problems() {
        let output = "\
[GNUPG:] IMPORT_PROBLEM 1 6B1F0E9D3C3F9B4E2A17C8D5E6F708192A3B4C5D
[GNUPG:] IMPORT_OK 1 08cd26e446e2e95249b7a405e932f44b23e8dd43
[GNUPG:] IMPORT_RES 2 0 1 0 0 0 0 0 0 0 0 0 0 0 0
";
        assert_eq!(parse_import(output).fingerprints, vec![FPR]);
    }

    #[test]
    fn import_without_result_is_incomplete() {
        assert!(!parse_import("gpg: fatal: can't open keybox\n").completed);
    }

    #[test]
    fn good_signature_with_fingerprint() {
        let output = "\
[GNUPG:] NEWSIG
[GNUPG:] KEY_CONSIDERED 08CD26E446E2E95249B7A405E932F44B23E8DD43 0
[GNUPG:] SIG_ID 6lm2s6WGvOKTH2VZC6yb9nOKKRQ 2024-02-11 1707656345
[GNUPG:] GOODSIG E932F44B23E8DD43 Test Signer <signer@example.com>
[GNUPG:] VALIDSIG 08CD26E446E2E95249B7A405E932F44B23E8DD43 2024-02-11 1707656345 0 4 0 22 10 00 08CD26E446E2E95249B7A405E932F44B23E8DD43
[GNUPG:] TRUST_UNDEFINED 0 pgp
";
        let report = parse_decode(output);
        assert_eq!(
            report.signatures,
            vec![SignatureCheck {
                state: SignatureState::Good,
                fingerprint: Some(FPR.into()),
                key_id: Some("E932F44B23E8DD43".into()),
            }]
        );
        assert!(!report.literal_seen);
    }

    #[test]
    fn plaintext_marks_literal() {
        let output = "[GNUPG:] PLAINTEXT 62 1707656345 \n[GNUPG:] PLAINTEXT_LENGTH 7\n";
        assert!(parse_decode(output).literal_seen);
    }

    #[test]
    fn expired_signature_keeps_state_after_validsig() {
        let output = "\
[GNUPG:] NEWSIG
[GNUPG:] EXPSIG E932F44B23E8DD43 Test Signer <signer@example.com>
[GNUPG:] VALIDSIG 08CD26E446E2E95249B7A405E932F44B23E8DD43 2020-01-01 1577840400 1577926800 4 0 22 10 00 08CD26E446E2E95249B7A405E932F44B23E8DD43
";
        let report = parse_decode(output);
        assert_eq!(report.signatures.len(), 1);
        assert_eq!(report.signatures[0].state, SignatureState::Expired);
        assert_eq!(report.signatures[0].fingerprint.as_deref(), Some(FPR));
    }

    #[test]
    fn missing_key_from_errsig() {
        let output = "\
[GNUPG:] NEWSIG
[GNUPG:] ERRSIG E5476D1110D07803 1 8 00 1464633474 9 -
[GNUPG:] NO_PUBKEY E5476D1110D07803
";
        let report = parse_decode(output);
        assert_eq!(report.signatures[0].state, SignatureState::MissingKey);
        assert_eq!(report.signatures[0].key_id.as_deref(), Some("E5476D1110D07803"));
        assert_eq!(report.signatures[0].fingerprint, None);
    }

    #[test]
    fn other_errsig_codes_are_errors() {
        let output = "[GNUPG:] NEWSIG\n[GNUPG:] ERRSIG E5476D1110D07803 99 8 00 1464633474 4 -\n";
        assert_eq!(parse_decode(output).signatures[0].state, SignatureState::Error);
    }

    #[test]
    fn bad_signature() {
        let output = "[GNUPG:] NEWSIG\n[GNUPG:] BADSIG E932F44B23E8DD43 Test Signer <signer@example.com>\n";
        assert_eq!(parse_decode(output).signatures[0].state, SignatureState::Bad);
    }

    #[test]
    fn two_signatures_are_two_records() {
        let output = "\
[GNUPG:] NEWSIG
[GNUPG:] GOODSIG E932F44B23E8DD43 Test Signer <signer@example.com>
[GNUPG:] VALIDSIG 08CD26E446E2E95249B7A405E932F44B23E8DD43 2024-02-11 1707656345 0 4 0 22 10 00 08CD26E446E2E95249B7A405E932F44B23E8DD43
[GNUPG:] NEWSIG
[GNUPG:] GOODSIG E5476D1110D07803 Other <other@example.com>
";
        assert_eq!(parse_decode(output).signatures.len(), 2);
    }

    #[test]
    fn verdict_without_newsig_opens_record() {
        let output = "[GNUPG:] GOODSIG E932F44B23E8DD43 Test\n[GNUPG:] BADSIG E5476D1110D07803 Other\n";
        let report = parse_decode(output);
        assert_eq!(report.signatures.len(), 2);
        assert_eq!(report.signatures[1].state, SignatureState::Bad);
    }

    #[test]
    fn newsig_without_verdict_fails_closed() {
        let report = parse_decode("[GNUPG:] NEWSIG\n");
        assert_eq!(report.signatures[0].state, SignatureState::Error);
    }
}
