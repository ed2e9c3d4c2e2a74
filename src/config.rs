//! Client configuration and the optional config file.
//!
//! [`ClientConfig`] is what [`crate::SteamLookup`] is constructed from. The
//! optional TOML file at `~/.config/steamlookup/config.toml` supplies a
//! [`Config`] whose fields override the defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Result, WrapErr};
use serde::Deserialize;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// 30 minutes.
pub const DEFAULT_CACHE_TTL_MS: u64 = 1_800_000;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;
pub const DEFAULT_API_BASE: &str = "https://api.steampowered.com";
pub const DEFAULT_COMMUNITY_BASE: &str = "https://steamcommunity.com";

/// Settings recognized when a client is constructed.
#[derive(Clone)]
pub struct ClientConfig {
    /// Per-request upstream timeout in milliseconds.
    pub timeout_ms: u64,
    /// Lifetime of a cached record in milliseconds.
    pub cache_ttl_ms: u64,
    pub cache_enabled: bool,
    /// Maximum entries per cache namespace.
    pub cache_max_entries: u64,
    /// Steam Web API key.
    pub credential: Option<String>,
    /// Log raw upstream bodies and echo the id into reputation records.
    pub debug: bool,
    pub api_base: String,
    pub community_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            cache_enabled: true,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            credential: None,
            debug: false,
            api_base: DEFAULT_API_BASE.to_string(),
            community_base: DEFAULT_COMMUNITY_BASE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// The credential, when set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("timeout_ms", &self.timeout_ms)
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("debug", &self.debug)
            .field("api_base", &self.api_base)
            .field("community_base", &self.community_base)
            .finish()
    }
}

/// Configuration loaded from the TOML file.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Upstream timeout in milliseconds (default: 5000)
    pub timeout_ms: Option<u64>,
    /// Cache TTL in milliseconds (default: 1800000)
    pub cache_ttl_ms: Option<u64>,
    /// Whether lookups are cached (default: true)
    pub cache_enabled: Option<bool>,
    /// Maximum entries per cache namespace (default: 10000)
    pub cache_max_entries: Option<u64>,
    /// Steam Web API key
    pub credential: Option<String>,
    /// Debug logging of upstream payloads
    pub debug: Option<bool>,
    /// Steam Web API base URL
    pub api_base: Option<String>,
    /// Steam Community base URL
    pub community_base: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_default()
            .join("steamlookup")
            .join("config.toml")
    }

    /// Read and parse the file at `path`. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).wrap_err_with(|| format!("reading {}", path.display())),
        };
        toml::from_str(&content)
            .map(Some)
            .wrap_err_with(|| format!("parsing {}", path.display()))
    }

    /// Overlay the file's settings on `base`.
    pub fn apply(self, base: ClientConfig) -> ClientConfig {
        ClientConfig {
            timeout_ms: self.timeout_ms.unwrap_or(base.timeout_ms),
            cache_ttl_ms: self.cache_ttl_ms.unwrap_or(base.cache_ttl_ms),
            cache_enabled: self.cache_enabled.unwrap_or(base.cache_enabled),
            cache_max_entries: self.cache_max_entries.unwrap_or(base.cache_max_entries),
            credential: self.credential.or(base.credential),
            debug: self.debug.unwrap_or(base.debug),
            api_base: self.api_base.unwrap_or(base.api_base),
            community_base: self.community_base.unwrap_or(base.community_base),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with the config file at [`Config::default_path`].
    pub fn load() -> Self {
        Self::load_from(&Config::default_path())
    }

    /// Defaults overlaid with the config file at `path`. A missing,
    /// unreadable or invalid file leaves the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        match Config::read(path) {
            Ok(Some(file)) => {
                tracing::info!(path = %path.display(), "loaded config");
                file.apply(Self::default())
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no config file");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = ?e, "ignoring config file");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(30 * 60));
        assert!(cfg.cache_enabled);
        assert!(!cfg.debug);
        assert!(cfg.credential().is_none());
    }

    #[test]
    fn test_blank_credential_is_unset() {
        let cfg = ClientConfig::default().with_credential("   ");
        assert!(cfg.credential().is_none());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let cfg = ClientConfig::default().with_credential("SECRETKEY");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("SECRETKEY"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_ms = 1000\ncache_enabled = false\ncredential = \"abc\"\n").unwrap();

        let cfg = ClientConfig::load_from(&path);
        assert_eq!(cfg.timeout_ms, 1000);
        assert!(!cfg.cache_enabled);
        assert_eq!(cfg.credential(), Some("abc"));
        assert_eq!(cfg.cache_ttl_ms, DEFAULT_CACHE_TTL_MS);
    }

    #[test]
    fn test_apply_keeps_base_for_unset_fields() {
        let file = Config {
            debug: Some(true),
            ..Config::default()
        };
        let cfg = file.apply(ClientConfig::default().with_credential("base"));
        assert!(cfg.debug);
        assert_eq!(cfg.credential(), Some("base"));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(Config::read(&path).unwrap().is_none());
        assert_eq!(ClientConfig::load_from(&path).timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_broken_file_is_error_and_load_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "timeout_ms = [").unwrap();

        let err = Config::read(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
        assert_eq!(ClientConfig::load_from(&path).timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
