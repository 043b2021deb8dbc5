use std::net::SocketAddr;
use std::path::PathBuf;

use crate::models::Language;

/// Application-level constants
pub const APP_NAME: &str = "AwareCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// SQLite file holding the persisted documents.
pub const DATABASE_FILE: &str = "awarecare.db";

const DEFAULT_BIND: &str = "127.0.0.1:8787";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "medgemma";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;

/// Get the application data directory
/// ~/AwareCare/ on all platforms, unless `AWARECARE_DATA_DIR` is set.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AWARECARE_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,awarecare_lib=debug"
    } else {
        "info"
    }
}

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub ollama_url: String,
    pub model: String,
    pub ai_timeout_secs: u64,
    pub language: Language,
}

impl Settings {
    /// Read settings from `AWARECARE_*` variables. Values that fail to
    /// parse fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = match lookup("AWARECARE_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid AWARECARE_BIND, using default");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let ai_timeout_secs = match lookup("AWARECARE_AI_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid AWARECARE_AI_TIMEOUT_SECS, using default");
                defaults.ai_timeout_secs
            }),
            None => defaults.ai_timeout_secs,
        };

        let language = match lookup("AWARECARE_LANG") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid AWARECARE_LANG, using default");
                defaults.language
            }),
            None => defaults.language,
        };

        Self {
            data_dir: lookup("AWARECARE_DATA_DIR")
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            bind_addr,
            ollama_url: lookup("AWARECARE_OLLAMA_URL").unwrap_or(defaults.ollama_url),
            model: lookup("AWARECARE_MODEL").unwrap_or(defaults.model),
            ai_timeout_secs,
            language,
        }
    }

    /// Path of the SQLite document store.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: app_data_dir(),
            bind_addr: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8787))),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            ai_timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
            language: Language::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_name_is_awarecare() {
        assert_eq!(APP_NAME, "AwareCare");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_when_env_empty() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.bind_addr.port(), 8787);
        assert_eq!(settings.ollama_url, "http://localhost:11434");
        assert_eq!(settings.model, "medgemma");
        assert_eq!(settings.ai_timeout_secs, 120);
        assert_eq!(settings.language, Language::He);
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("AWARECARE_DATA_DIR", "/tmp/awarecare-test"),
            ("AWARECARE_BIND", "0.0.0.0:9000"),
            ("AWARECARE_MODEL", "llama3:8b"),
            ("AWARECARE_LANG", "en"),
            ("AWARECARE_AI_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/awarecare-test"));
        assert_eq!(settings.bind_addr.port(), 9000);
        assert_eq!(settings.model, "llama3:8b");
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.ai_timeout_secs, 30);
        assert!(settings.database_path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("AWARECARE_BIND", "not-an-address"),
            ("AWARECARE_LANG", "fr"),
            ("AWARECARE_AI_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(settings.bind_addr.port(), 8787);
        assert_eq!(settings.language, Language::He);
        assert_eq!(settings.ai_timeout_secs, 120);
    }
}
