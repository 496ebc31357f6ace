//! On-disk layout for durable data, session data, logs and exports.
//!
//! # Responsibility
//! - Derive every file path the application touches from one data directory.
//! - Provide a platform default data directory.
//!
//! # Invariants
//! - Resolved paths are absolute (logging rejects relative directories).
//! - The durable tree store and the session ledger never share a file.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Durable task tree database file.
pub const TASKS_DB_FILE_NAME: &str = "nesttask.sqlite3";
/// Session completion ledger database file.
pub const SESSION_DB_FILE_NAME: &str = "session.sqlite3";
pub const LOG_DIR_NAME: &str = "logs";
pub const EXPORT_DIR_NAME: &str = "exports";

const APP_DIR_NAME: &str = "nesttask";

/// Errors from resolving or preparing the data directory.
#[derive(Debug)]
pub enum ConfigError {
    /// No data directory was given and the platform has no default.
    MissingDataDir,
    /// Directory creation or current-dir lookup failed.
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataDir => write!(
                f,
                "no data directory configured and no platform default is available"
            ),
            Self::Io { path, source } => {
                write!(f, "failed to prepare `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingDataDir => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Resolved application paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    /// Resolves `data_dir`, falling back to the platform data directory.
    ///
    /// Relative paths are anchored at the current working directory.
    pub fn resolve(data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let raw = match data_dir {
            Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
            _ => default_data_dir().ok_or(ConfigError::MissingDataDir)?,
        };
        if raw.is_absolute() {
            return Ok(Self { data_dir: raw });
        }

        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: raw.clone(),
            source,
        })?;
        Ok(Self {
            data_dir: cwd.join(raw),
        })
    }

    /// Creates the data, log and export directories if missing.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [self.data_dir.clone(), self.log_dir(), self.export_dir()] {
            std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io { path: dir, source })?;
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_db_path(&self) -> PathBuf {
        self.data_dir.join(TASKS_DB_FILE_NAME)
    }

    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join(EXPORT_DIR_NAME)
    }
}

/// Platform data directory for this application, e.g. `~/.local/share/nesttask`.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::{AppPaths, SESSION_DB_FILE_NAME, TASKS_DB_FILE_NAME};
    use std::path::Path;

    #[test]
    fn relative_data_dir_is_anchored_at_cwd() {
        let paths = AppPaths::resolve(Some(Path::new("state"))).unwrap();
        assert!(paths.data_dir().is_absolute());
        assert!(paths.data_dir().ends_with("state"));
    }

    #[test]
    fn durable_and_session_stores_use_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::resolve(Some(dir.path())).unwrap();
        assert_eq!(paths.tasks_db_path(), dir.path().join(TASKS_DB_FILE_NAME));
        assert_eq!(paths.session_db_path(), dir.path().join(SESSION_DB_FILE_NAME));
        assert_ne!(paths.tasks_db_path(), paths.session_db_path());
    }

    #[test]
    fn ensure_dirs_creates_log_and_export_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::resolve(Some(&dir.path().join("nested"))).unwrap();
        paths.ensure_dirs().unwrap();
        assert!(paths.log_dir().is_dir());
        assert!(paths.export_dir().is_dir());
    }
}
