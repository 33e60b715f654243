//! Environment configuration.

use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DATA_DIR_NAME: &str = "konus-cengo";
const DB_FILE_NAME: &str = "konus-cengo.db";

/// Host settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// `GEMINI_API_KEY`. Without it the language model is unavailable.
    pub api_key: Option<String>,
    /// `LINGO_MODEL`
    pub model: String,
    /// `LINGO_API_BASE`
    pub api_base: String,
    /// `LINGO_DATA_DIR`
    pub data_dir: PathBuf,
}

impl HostConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: var("GEMINI_API_KEY"),
            model: var("LINGO_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: var("LINGO_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            data_dir: var("LINGO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = HostConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.data_dir.ends_with("konus-cengo"));
    }

    #[test]
    fn overrides_from_environment() {
        let config = HostConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("LINGO_MODEL", "gemini-2.0-pro"),
            ("LINGO_API_BASE", "http://localhost:8080/"),
            ("LINGO_DATA_DIR", "/tmp/lingo"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/lingo/konus-cengo.db"));
    }
}
