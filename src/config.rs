use std::path::PathBuf;

use anyhow::Result;

use crate::api::SecurityConfig;
use crate::db::Database;

pub const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration, read from the environment and overridable by CLI flags.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storage file (from CCAL_DB_PATH). Defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
    /// HTTP port (from CCAL_PORT).
    pub port: u16,
    pub security: SecurityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            port: DEFAULT_PORT,
            security: SecurityConfig::disabled(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_path = std::env::var("CCAL_DB_PATH").ok().map(PathBuf::from);

        let port = std::env::var("CCAL_PORT")
            .ok()
            .and_then(|s| match s.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CCAL_PORT value: {}", s);
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        Self {
            db_path,
            port,
            security: SecurityConfig::from_env(),
        }
    }

    /// Open and migrate the configured storage.
    pub fn open_database(&self) -> Result<Database> {
        let db = match &self.db_path {
            Some(path) => Database::open(path.clone())?,
            None => Database::open_default()?,
        };
        db.migrate()?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_3000_without_auth() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert!(config.db_path.is_none());
        assert!(config.security.api_key.is_none());
    }

    #[test]
    fn open_database_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: Some(dir.path().join("nested").join("calendar.db")),
            ..AppConfig::default()
        };
        let db = config.open_database().unwrap();
        assert_eq!(db.get_item("missing").unwrap(), None);
    }
}
