// src/config.rs

use std::collections::BTreeMap;
use std::env;

use dotenvy::dotenv;

/// Version segment of every API path.
pub const API_VERSION: &str = "v1";

/// Path prefix shared by every API version.
pub const API_PREFIX: &str = "/zsyx/api";

/// How many identifier candidates are tried before giving up.
pub const ID_MAX_ATTEMPTS: u32 = 5;

/// Format of every timestamp written to the store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Text shown for every option of the answer sheet handed to students.
pub const ANSWER_SHEET_HINT: &str = "Answer sheet: write your answer below.";

/// Option keys of the answer sheet.
pub const ANSWER_SHEET_KEYS: [&str; 4] = ["A", "B", "C", "D"];

/// Builds the fixed option map attached to every question a student fetches.
pub fn answer_sheet() -> BTreeMap<String, String> {
    ANSWER_SHEET_KEYS
        .iter()
        .map(|key| (key.to_string(), ANSWER_SHEET_HINT.to_string()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub port: u16,
    /// Directory holding the built front-end.
    pub front_dir: String,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data.sqlite?mode=rwc".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(24748);

        let front_dir = env::var("FRONT_DIR").unwrap_or_else(|_| "./front".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Self {
            database_url,
            rust_log,
            port,
            front_dir,
            cors_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let origins = parse_origins(" http://localhost:3000 , ,http://127.0.0.1:3000");
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn answer_sheet_has_four_placeholder_options() {
        let sheet = answer_sheet();
        assert_eq!(sheet.len(), 4);
        assert!(sheet.values().all(|v| v == ANSWER_SHEET_HINT));
        assert_eq!(sheet.keys().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
    }
}
