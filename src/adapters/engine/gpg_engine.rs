use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::adapters::engine::status;
use crate::config::app_config::EngineSection;
use crate::core::errors::{Result, TrustsigError};
use crate::core::models::decoded_message::DecodedMessage;
use crate::core::traits::signing_engine::SigningEngine;

/// OpenPGP engine that shells out to the system `gpg` binary, rooted at
/// one keyring directory through `--homedir`.
///
/// Requires GnuPG 2.1 or newer. Every invocation is non-interactive;
/// decoding and packet listing never ask for a passphrase.
#[derive(Debug)]
pub struct GpgEngine {
    gpg_path: PathBuf,
    gpgconf_path: PathBuf,
    home: PathBuf,
    /// Whether `release` should stop the gpg-agent serving `home`.
    owns_agent: bool,
}

impl GpgEngine {
    /// Initialize an engine against `home`, checking that gpg can open
    /// the keyring there.
    pub fn open(home: &Path, config: &EngineSection) -> Result<Self> {
        let engine = Self {
            gpg_path: config.gpg_path.clone(),
            gpgconf_path: config.gpgconf_path.clone(),
            home: home.to_path_buf(),
            owns_agent: false,
        };

        let output = engine
            .run(["--with-colons", "--list-keys"], None)
            .map_err(|e| TrustsigError::EngineInit {
                home: home.to_path_buf(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(TrustsigError::EngineInit {
                home: home.to_path_buf(),
                reason: stderr_text(&output),
            });
        }

        tracing::debug!(home = %home.display(), gpg = %engine.gpg_path.display(), "gpg engine ready");
        Ok(engine)
    }

    /// Mark the keyring as private to this engine, so that `release`
    /// shuts down its agent.
    pub fn with_owned_agent(mut self) -> Self {
        self.owns_agent = true;
        self
    }

    /// Check if the gpg binary at `gpg_path` can be executed.
    pub fn is_available(gpg_path: &Path) -> bool {
        Command::new(gpg_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.gpg_path);
        cmd.arg("--homedir")
            .arg(&self.home)
            .args(["--batch", "--no-tty"])
            .env("LC_ALL", "C");
        cmd
    }

    /// Run gpg with `args`, feeding `stdin_data` if given.
    ///
    /// Only a failure to run the process is an error; the exit status is
    /// left for the caller to interpret.
    fn run<I, S>(&self, args: I, stdin_data: Option<&[u8]>) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command();
        cmd.args(args)
            .stdin(if stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(?cmd, "running gpg");
        let mut child = cmd.spawn().map_err(|e| TrustsigError::Engine {
            reason: format!("Failed to run {}: {e}", self.gpg_path.display()),
        })?;

        // Feed stdin from a separate thread: gpg streams its output while
        // reading, and a full stdout pipe would otherwise block both sides.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = match (stdin, stdin_data) {
                (Some(mut stdin), Some(data)) => Some(scope.spawn(move || stdin.write_all(data))),
                _ => None,
            };
            let output = child.wait_with_output();
            let written = writer.map(|w| w.join());
            (output, written)
        });

        let output = output.map_err(|e| TrustsigError::Engine {
            reason: format!("gpg process failed: {e}"),
        })?;

        match written {
            None | Some(Ok(Ok(()))) => {}
            // gpg stops reading once it knows the input is unusable.
            Some(Ok(Err(e))) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Some(Ok(Err(e))) => {
                return Err(TrustsigError::Engine {
                    reason: format!("Failed to write to gpg stdin: {e}"),
                });
            }
            Some(Err(_)) => {
                return Err(TrustsigError::Engine {
                    reason: "gpg stdin writer panicked".into(),
                });
            }
        }

        tracing::debug!(status = ?output.status, "gpg finished");
        Ok(output)
    }

    /// Like `run`, with gpg's status lines written to a private temporary
    /// file instead of a stream shared with diagnostics or data.
    ///
    /// Returns the process output and the status text.
    fn run_with_status(&self, args: &[&str], stdin_data: Option<&[u8]>) -> Result<(Output, String)> {
        let status_file = tempfile::Builder::new()
            .prefix("trustsig-status-")
            .tempfile()
            .map_err(|e| TrustsigError::Engine {
                reason: format!("Failed to create status file: {e}"),
            })?;

        let mut full_args: Vec<&OsStr> = vec![
            OsStr::new("--status-file"),
            status_file.path().as_os_str(),
        ];
        full_args.extend(args.iter().map(OsStr::new));
        let output = self.run(full_args, stdin_data)?;

        let status = std::fs::read(status_file.path()).map_err(|e| TrustsigError::Engine {
            reason: format!("Failed to read gpg status output: {e}"),
        })?;
        Ok((output, String::from_utf8_lossy(&status).into_owned()))
    }
}

impl SigningEngine for GpgEngine {
    fn home(&self) -> &Path {
        &self.home
    }

    fn import(&self, key_blob: &[u8]) -> Result<Vec<String>> {
        let (output, status_text) = self
            .run_with_status(&["--import"], Some(key_blob))
            .map_err(|e| TrustsigError::Import {
                reason: e.to_string(),
            })?;

        let report = status::parse_import(&status_text);
        // gpg exits non-zero for blobs without any key, which is still a
        // complete (empty) import.
        if !report.completed && !output.status.success() {
            return Err(TrustsigError::Import {
                reason: stderr_text(&output),
            });
        }
        Ok(report.fingerprints)
    }

    fn sign(&self, content: &[u8], fingerprint: &str) -> Result<Vec<u8>> {
        let output = self
            .run(["--yes", "--local-user", fingerprint, "--sign"], Some(content))
            .map_err(|e| TrustsigError::Signing {
                fingerprint: fingerprint.into(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(TrustsigError::Signing {
                fingerprint: fingerprint.into(),
                reason: stderr_text(&output),
            });
        }
        if output.stdout.is_empty() {
            return Err(TrustsigError::Signing {
                fingerprint: fingerprint.into(),
                reason: "gpg produced no signature".into(),
            });
        }
        Ok(output.stdout)
    }

    fn decode(&self, message: &[u8]) -> Result<DecodedMessage> {
        let (output, status_text) = self.run_with_status(
            &["--trust-model", "always", "--pinentry-mode", "error", "--decrypt"],
            Some(message),
        )?;

        // A bad or unverifiable signature makes gpg exit non-zero after it
        // has already written the literal data; the status lines decide.
        let report = status::parse_decode(&status_text);
        let plaintext = if report.literal_seen {
            output.stdout
        } else {
            Vec::new()
        };

        Ok(DecodedMessage {
            plaintext,
            literal_seen: report.literal_seen,
            signatures: report.signatures,
        })
    }

    fn list_packets(&self, blob: &[u8]) -> Result<String> {
        let output = self.run(["--pinentry-mode", "error", "--list-packets"], Some(blob))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn release(&self) {
        if !self.owns_agent {
            return;
        }
        let result = Command::new(&self.gpgconf_path)
            .arg("--homedir")
            .arg(&self.home)
            .args(["--kill", "all"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match result {
            Ok(status) if status.success() => {
                tracing::debug!(home = %self.home.display(), "stopped gpg-agent");
            }
            Ok(status) => tracing::warn!(%status, "gpgconf --kill exited with error"),
            Err(e) => tracing::warn!(error = %e, "could not run gpgconf to stop gpg-agent"),
        }
    }

    fn name(&self) -> &str {
        "gpg"
    }
}

fn stderr_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("gpg exited with {}", output.status)
    } else {
        trimmed.to_string()
    }
}
