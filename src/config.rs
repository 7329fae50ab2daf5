use leetscrape_indexer_1337x::Indexer1337xConfig;
use std::path::{Path, PathBuf};

const DEFAULT_PATH: &str = "./config.toml";

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: Indexer1337xConfig,
}

impl Config {
    /// Reads `path`, then `CONFIG_FILE`, then `./config.toml` if present,
    /// and falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = path {
            return Self::from_path(path.to_path_buf());
        }
        if let Ok(path) = std::env::var("CONFIG_FILE") {
            return Self::from_path(PathBuf::from(path));
        }
        let path = PathBuf::from(DEFAULT_PATH);
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_path(path: PathBuf) -> Result<Self, String> {
        std::fs::read_to_string(&path)
            .map_err(|err| format!("unable to read {path:?}: {err}"))
            .and_then(|inner| Self::from_str(inner.as_str()))
    }

    pub fn from_str(inner: &str) -> Result<Self, String> {
        toml::from_str(inner).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn should_use_defaults_for_empty_file() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.indexer.base_url, "https://1337x.to");
        assert_eq!(config.indexer.detail_path, "/torrent/");
        assert_eq!(config.indexer.page_size, 20);
        assert_eq!(config.indexer.max_pages, 10);
        assert_eq!(config.indexer.timeout, 30);
        assert_eq!(config.indexer.columns.name, 1);
        assert_eq!(config.indexer.columns.size, 5);
    }

    #[test]
    fn should_override_some_values() {
        let config = Config::from_str(
            r#"
[indexer]
base_url = "https://1337x.st"
max_pages = 3

[indexer.columns]
size = 6
"#,
        )
        .unwrap();
        assert_eq!(config.indexer.base_url, "https://1337x.st");
        assert_eq!(config.indexer.max_pages, 3);
        assert_eq!(config.indexer.page_size, 20);
        assert_eq!(config.indexer.columns.size, 6);
        assert_eq!(config.indexer.columns.seeds, 2);
    }

    #[test]
    fn should_report_invalid_file() {
        assert!(Config::from_str("indexer = 42").is_err());
        assert!(Config::from_path("/does/not/exist.toml".into()).is_err());
    }
}
