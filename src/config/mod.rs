//! Configuration management for rss_reader.
//!
//! Configuration is read from `--config <path>` when given, otherwise from
//! `~/.config/rss_reader/config.toml` if that file exists. Without either,
//! the built-in defaults are used: the article store and the generated
//! documents live in the working directory.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LIMIT: usize = 400;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
    pub reader: ReaderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file holding the `article_list` table.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("articles.db"),
        }
    }
}

/// Where rendered documents are written. Existing files are replaced.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    /// TrueType font embedded in the PDF. When unset, a system DejaVu Sans
    /// is looked up, falling back to the built-in Helvetica.
    pub pdf_font: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from("article_list.html"),
            pdf_path: PathBuf::from("article_list.pdf"),
            pdf_font: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("rss_reader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Used when `--limit` is not passed.
    pub default_limit: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. The default path is optional:
    /// a missing file there yields [`Config::default`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            Ok(_) | Err(ConfigError::NoConfigDir) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/rss_reader/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("rss_reader").join("config.toml"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.storage.database_path, PathBuf::from("articles.db"));
        assert_eq!(config.output.html_path, PathBuf::from("article_list.html"));
        assert_eq!(config.output.pdf_path, PathBuf::from("article_list.pdf"));
        assert_eq!(config.output.pdf_font, None);
        assert_eq!(config.reader.default_limit, 400);
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
[storage]
database_path = "/tmp/news.db"

[fetch]
timeout_secs = 3
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/news.db"));
        assert_eq!(config.fetch.timeout_secs, 3);
        // Untouched sections keep their defaults
        assert!(config.fetch.user_agent.starts_with("rss_reader/"));
        assert_eq!(config.output.pdf_path, PathBuf::from("article_list.pdf"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nhtml_path = \"out/news.html\"\npdf_font = \"/fonts/DejaVuSans.ttf\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.output.html_path, PathBuf::from("out/news.html"));
        assert_eq!(config.output.pdf_font, Some(PathBuf::from("/fonts/DejaVuSans.ttf")));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage\ndatabase_path = 1").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
