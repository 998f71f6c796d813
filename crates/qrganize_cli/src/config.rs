//! Environment-driven runtime configuration.
//!
//! # Invariants
//! - Blank variables are treated as absent.
//! - Logging stays disabled unless `QRGANIZE_LOG_DIR` is set.

use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "QRGANIZE_DB_PATH";
pub const LOG_DIR_ENV: &str = "QRGANIZE_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "QRGANIZE_LOG_LEVEL";
const DEFAULT_DB_FILE_NAME: &str = "storage.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_dir: non_blank(LOG_DIR_ENV),
            log_level: non_blank(LOG_LEVEL_ENV)
                .unwrap_or_else(|| qrganize_core::default_log_level().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.db_path, PathBuf::from("storage.db"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, qrganize_core::default_log_level());
    }

    #[test]
    fn blank_values_are_ignored_and_others_trimmed() {
        let config = config_from(&[
            (DB_PATH_ENV, "  /var/lib/qrganize/inventory.db "),
            (LOG_DIR_ENV, "   "),
            (LOG_LEVEL_ENV, "warn"),
        ]);
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/qrganize/inventory.db")
        );
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, "warn");
    }
}
