//! Connection settings resolution.
//!
//! Each value comes from the first source that sets it: command-line flag
//! or its environment variable (clap handles both), then the optional TOML
//! settings file, then the built-in default.

use crate::constants;
use crate::error::{Result, SeedError};
use crate::models::vault_config::SettingsFile;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use zeroize::Zeroizing;

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub secret_path: Option<String>,
    pub timeout_secs: Option<u64>,
    pub journald: bool,
}

/// Fully resolved settings for one run.
#[derive(Clone)]
pub struct Settings {
    pub address: String,
    pub token: Zeroizing<String>,
    pub namespace: Option<String>,
    pub secret_path: String,
    pub timeout: Duration,
    pub journald: bool,
}

impl Settings {
    /// Resolve settings, reading `config` when given.
    pub fn resolve(overrides: Overrides, config: Option<&Path>) -> Result<Self> {
        let file = match config {
            Some(path) => load(path)?,
            None => SettingsFile::default(),
        };
        Ok(Self::merge(overrides, file))
    }

    /// Combine overrides with a parsed settings file.
    pub fn merge(overrides: Overrides, file: SettingsFile) -> Self {
        let timeout_secs = overrides
            .timeout_secs
            .or(file.vault.timeout_secs)
            .filter(|secs| *secs > 0)
            .map(|secs| secs.min(constants::MAX_HTTP_TIMEOUT_SECS))
            .unwrap_or(constants::DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            address: overrides
                .address
                .or(file.vault.address)
                .unwrap_or_else(|| constants::DEFAULT_VAULT_ADDR.to_string()),
            token: Zeroizing::new(
                overrides
                    .token
                    .or(file.vault.token)
                    .unwrap_or_else(|| constants::DEFAULT_VAULT_TOKEN.to_string()),
            ),
            namespace: overrides.namespace.or(file.vault.namespace),
            secret_path: overrides
                .secret_path
                .or(file.secret.path)
                .unwrap_or_else(|| constants::DEFAULT_SECRET_PATH.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            journald: overrides.journald || file.logging.journald,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("secret_path", &self.secret_path)
            .field("timeout", &self.timeout)
            .field("journald", &self.journald)
            .finish()
    }
}

/// Load a settings file. A missing or unparsable file is an error.
pub fn load(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)
        .map_err(|e| SeedError::Config(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| SeedError::Config(format!("parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::merge(Overrides::default(), SettingsFile::default());
        assert_eq!(settings.address, constants::DEFAULT_VAULT_ADDR);
        assert_eq!(settings.token.as_str(), constants::DEFAULT_VAULT_TOKEN);
        assert_eq!(settings.secret_path, constants::DEFAULT_SECRET_PATH);
        assert_eq!(
            settings.timeout,
            Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS)
        );
        assert!(settings.namespace.is_none());
        assert!(!settings.journald);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
[vault]
address = "https://vault.internal:8200"
namespace = "team-a"
timeout_secs = 5

[secret]
path = "secret/data/stormsync/staging"

[logging]
journald = true
"#,
        );
        let settings = Settings::resolve(Overrides::default(), Some(file.path())).unwrap();
        assert_eq!(settings.address, "https://vault.internal:8200");
        assert_eq!(settings.namespace.as_deref(), Some("team-a"));
        assert_eq!(settings.secret_path, "secret/data/stormsync/staging");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert!(settings.journald);
        assert_eq!(settings.token.as_str(), constants::DEFAULT_VAULT_TOKEN);
    }

    #[test]
    fn test_flags_override_file() {
        let file = write_config(
            r#"
[vault]
address = "https://from-file:8200"
token = "file-token"
"#,
        );
        let overrides = Overrides {
            address: Some("http://from-flag:8200".into()),
            token: Some("flag-token".into()),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, Some(file.path())).unwrap();
        assert_eq!(settings.address, "http://from-flag:8200");
        assert_eq!(settings.token.as_str(), "flag-token");
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            ..Overrides::default()
        };
        let settings = Settings::merge(overrides, SettingsFile::default());
        assert_eq!(
            settings.timeout,
            Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_huge_timeout_is_capped() {
        let file = write_config("[vault]\ntimeout_secs = 9223372036854775807\n");
        let settings = Settings::resolve(Overrides::default(), Some(file.path())).unwrap();
        assert_eq!(
            settings.timeout,
            Duration::from_secs(constants::MAX_HTTP_TIMEOUT_SECS)
        );

        let overrides = Overrides {
            timeout_secs: Some(u64::MAX),
            ..Overrides::default()
        };
        let settings = Settings::merge(overrides, SettingsFile::default());
        assert_eq!(
            settings.timeout,
            Duration::from_secs(constants::MAX_HTTP_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::resolve(Overrides::default(), Some(&dir.path().join("nope.toml")))
            .unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let file = write_config("[vault\naddress = ");
        let err = Settings::resolve(Overrides::default(), Some(file.path())).unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let overrides = Overrides {
            token: Some("s.very-secret".into()),
            ..Overrides::default()
        };
        let settings = Settings::merge(overrides, SettingsFile::default());
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("s.very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
