use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::photo::DEFAULT_PHOTO_URL;

const APP_DIR: &str = "hoops_roster";
const DB_FILE: &str = "roster.sqlite";
const LOG_FILE: &str = "hoops_roster.log";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub photos_enabled: bool,
    pub photo_url_template: String,
    pub photo_cache_dir: Option<PathBuf>,
    pub http_timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env.local` and `.env` (if present), then the process env.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let db_path = match env_nonblank("ROSTER_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path().context("unable to resolve sqlite path")?,
        };

        let photo_url_template =
            env_nonblank("ROSTER_PHOTO_URL").unwrap_or_else(|| DEFAULT_PHOTO_URL.to_string());
        if !photo_url_template.contains("{player_id}") {
            return Err(anyhow!(
                "ROSTER_PHOTO_URL must contain a {{player_id}} placeholder"
            ));
        }

        let photos_enabled = env_nonblank("ROSTER_PHOTOS")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);
        let photo_cache = env_nonblank("ROSTER_PHOTO_CACHE")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);
        let photo_cache_dir = if photo_cache {
            app_cache_dir().map(|dir| dir.join("photos"))
        } else {
            None
        };

        let http_timeout_secs = env_nonblank("ROSTER_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);

        let log_file = env_nonblank("ROSTER_LOG_FILE")
            .map(PathBuf::from)
            .or_else(|| app_cache_dir().map(|dir| dir.join(LOG_FILE)));

        Ok(Self {
            db_path,
            photos_enabled,
            photo_url_template,
            photo_cache_dir,
            http_timeout_secs,
            log_file,
        })
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

pub fn app_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Some(base) = env_nonblank("XDG_CACHE_HOME") {
        return Some(PathBuf::from(base).join(APP_DIR));
    }
    let home = env_nonblank("HOME")?;
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

fn env_nonblank(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_bool;

    #[test]
    fn parse_bool_only_rejects_explicit_off_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("OFF"));
        assert!(!parse_bool(" false "));
    }
}
