#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use assert_fs::TempDir;
use trustsig::GpgEngine;

pub const SIGNER_UID: &str = "Test Signer <signer@example.com>";

/// Whether a usable gpg is on PATH. Tests that need one return early
/// when it is missing.
pub fn gpg_available() -> bool {
    GpgEngine::is_available(Path::new("gpg"))
}

/// Run gpg against `home` and fail the test if it exits non-zero.
pub fn gpg(home: &Path, args: &[&str], stdin: Option<&[u8]>) -> Output {
    let mut child = Command::new("gpg")
        .arg("--homedir")
        .arg(home)
        .args(["--batch", "--no-tty", "--pinentry-mode", "loopback", "--passphrase", ""])
        .args(args)
        .env("LC_ALL", "C")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut pipe = child.stdin.take().unwrap();
    if let Some(data) = stdin {
        pipe.write_all(data).unwrap();
    }
    drop(pipe);

    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "gpg {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// A throwaway keyring holding one signing key without a passphrase.
pub struct TestKeyring {
    pub dir: TempDir,
    pub fingerprint: String,
}

impl TestKeyring {
    pub fn new() -> Self {
        Self::generate(&[])
    }

    /// Keyring whose key was created on 2020-01-01.
    pub fn created_in_2020() -> Self {
        Self::generate(&["--faked-system-time", "20200101T000000"])
    }

    fn generate(extra: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut args = extra.to_vec();
        args.extend(["--quick-gen-key", SIGNER_UID, "ed25519", "sign", "never"]);
        gpg(dir.path(), &args, None);

        let listing = gpg(dir.path(), &["--with-colons", "--list-secret-keys"], None);
        let fingerprint = String::from_utf8_lossy(&listing.stdout)
            .lines()
            .find(|l| l.starts_with("fpr:"))
            .and_then(|l| l.split(':').nth(9))
            .unwrap()
            .to_string();

        Self { dir, fingerprint }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    /// 16 hex digit key ID of the signing key.
    pub fn short_key_id(&self) -> &str {
        &self.fingerprint[self.fingerprint.len() - 16..]
    }

    pub fn export_public(&self) -> Vec<u8> {
        gpg(self.home(), &["--export", self.fingerprint.as_str()], None).stdout
    }

    pub fn export_public_armored(&self) -> Vec<u8> {
        gpg(self.home(), &["--armor", "--export", self.fingerprint.as_str()], None).stdout
    }

    /// Sign without compression, so the content appears verbatim in the blob.
    pub fn sign_uncompressed(&self, content: &[u8]) -> Vec<u8> {
        gpg(
            self.home(),
            &["--local-user", self.fingerprint.as_str(), "--compress-algo", "none", "--sign"],
            Some(content),
        )
        .stdout
    }

    /// Signature made on 2020-01-01 that expired a day later.
    pub fn sign_expired(&self, content: &[u8]) -> Vec<u8> {
        gpg(
            self.home(),
            &[
                "--faked-system-time",
                "20200101T010000",
                "--default-sig-expire",
                "1d",
                "--local-user",
                self.fingerprint.as_str(),
                "--sign",
            ],
            Some(content),
        )
        .stdout
    }
}

impl Drop for TestKeyring {
    fn drop(&mut self) {
        let _ = Command::new("gpgconf")
            .arg("--homedir")
            .arg(self.dir.path())
            .args(["--kill", "all"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}

/// A literal data packet with no signature.
pub fn bare_literal(home: &Path, content: &[u8]) -> Vec<u8> {
    gpg(home, &["--compress-algo", "none", "--store"], Some(content)).stdout
}

/// A symmetrically encrypted message.
pub fn encrypted(home: &Path, content: &[u8]) -> Vec<u8> {
    Command::new("gpg")
        .arg("--homedir")
        .arg(home)
        .args([
            "--batch",
            "--no-tty",
            "--pinentry-mode",
            "loopback",
            "--passphrase",
            "secret",
            "--symmetric",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            child.stdin.take().unwrap().write_all(content)?;
            child.wait_with_output()
        })
        .unwrap()
        .stdout
}

/// Replace the first occurrence of `from` in `blob` with `to`.
pub fn tamper(blob: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    assert_eq!(from.len(), to.len());
    let at = blob
        .windows(from.len())
        .position(|w| w == from)
        .expect("content present in blob");
    let mut out = blob.to_vec();
    out[at..at + to.len()].copy_from_slice(to);
    out
}
