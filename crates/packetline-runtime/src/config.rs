use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. PACKETLINE_CONFIG environment variable (with tilde expansion)
/// 3. System config directory
/// 4. ~/.packetline/config.toml (fallback for systems without one)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Explicit path
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    // Priority 2: PACKETLINE_CONFIG environment variable
    if let Ok(env_path) = std::env::var("PACKETLINE_CONFIG") {
        return Ok(expand_tilde(&env_path));
    }

    // Priority 3: System config directory
    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("packetline").join("config.toml"));
    }

    // Priority 4: Fallback to ~/.packetline
    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".packetline").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or system config directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// How a stored packet log is fed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// The whole log in one batch call
    #[default]
    Batch,
    /// One growing prefix per packet, as a live stream would deliver it
    Incremental,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReplayConfig {
    #[serde(default)]
    pub mode: ReplayMode,
    /// Include packet bodies in JSON snapshots
    #[serde(default)]
    pub include_packets: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions treated as packet logs
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    ["json", "jsonl", "log"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        resolve_config_path(None)
    }

    /// Whether `path` has one of the configured packet-log extensions.
    pub fn is_log_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.scan
                    .extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.replay.mode, ReplayMode::Batch);
        assert!(!config.replay.include_packets);
        assert_eq!(config.scan.extensions, vec!["json", "jsonl", "log"]);
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.replay.mode = ReplayMode::Incremental;
        config.scan.extensions = vec!["ndjson".to_string()];

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[replay]\ninclude_packets = true\n")?;

        let config = Config::load_from(&config_path)?;
        assert!(config.replay.include_packets);
        assert_eq!(config.replay.mode, ReplayMode::Batch);
        assert_eq!(config.scan, ScanConfig::default());

        Ok(())
    }

    #[test]
    fn test_invalid_config_is_toml_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[replay]\nmode = \"sideways\"\n")?;

        assert!(matches!(
            Config::load_from(&config_path),
            Err(Error::Toml(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() -> Result<()> {
        let path = resolve_config_path(Some("/etc/packetline.toml"))?;
        assert_eq!(path, PathBuf::from("/etc/packetline.toml"));
        Ok(())
    }

    #[test]
    fn test_is_log_file() {
        let config = Config::default();
        assert!(config.is_log_file(Path::new("a/session.JSONL")));
        assert!(config.is_log_file(Path::new("stream.log")));
        assert!(!config.is_log_file(Path::new("notes.md")));
        assert!(!config.is_log_file(Path::new("Makefile")));
    }
}
