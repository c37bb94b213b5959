use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, TrustsigError};

/// Top-level configuration read from `config.toml`.
///
/// Every section and key is optional; a missing file means defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineSection,
    pub ephemeral: EphemeralSection,
}

impl AppConfig {
    /// Load the configuration from `path`.
    ///
    /// After parsing, validates the ephemeral directory prefix so that a
    /// hostile config file cannot steer temporary keyrings elsewhere.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TrustsigError::InvalidConfig {
                detail: format!("{} not found", path.display()),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| TrustsigError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;

        validate_prefix(&config.ephemeral.prefix)?;
        Ok(config)
    }

    /// Load `explicit` if given, else the default location if it exists,
    /// else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/trustsig/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("trustsig").join("config.toml"))
    }

    /// Keyring used when the caller names none.
    ///
    /// Resolution order:
    /// 1. `GNUPGHOME`
    /// 2. `[engine] default_home`
    /// 3. `~/.gnupg`
    pub fn default_keyring(&self) -> Result<PathBuf> {
        if let Some(home) = std::env::var_os("GNUPGHOME").filter(|h| !h.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        if let Some(home) = &self.engine.default_home {
            return Ok(home.clone());
        }
        let home = dirs::home_dir().ok_or_else(|| TrustsigError::InvalidConfig {
            detail: "Could not determine home directory".into(),
        })?;
        Ok(home.join(".gnupg"))
    }
}

/// The `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Path to the gpg binary.
    pub gpg_path: PathBuf,
    /// Path to gpgconf, used to stop agents of ephemeral keyrings.
    pub gpgconf_path: PathBuf,
    pub default_home: Option<PathBuf>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            gpg_path: PathBuf::from("gpg"),
            gpgconf_path: PathBuf::from("gpgconf"),
            default_home: None,
        }
    }
}

/// The `[ephemeral]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EphemeralSection {
    /// File name prefix of temporary keyring directories.
    pub prefix: String,
    /// Where temporary keyrings are created (system temp dir if unset).
    pub parent_dir: Option<PathBuf>,
}

impl Default for EphemeralSection {
    fn default() -> Self {
        Self {
            prefix: "trustsig-keyring-".into(),
            parent_dir: None,
        }
    }
}

/// Reject prefixes that are empty or could escape the parent directory.
fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty()
        || prefix.contains('/')
        || prefix.contains('\\')
        || prefix.contains("..")
        || prefix.contains('\0')
    {
        return Err(TrustsigError::InvalidConfig {
            detail: format!(
                "Invalid ephemeral prefix '{prefix}'. \
                 Use a plain name without path separators."
            ),
        });
    }
    Ok(())
}
