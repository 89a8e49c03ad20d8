use std::path::{Path, PathBuf};

use crate::data::loader::DataPaths;

pub const DATA_DIR_VAR: &str = "EV_DASHBOARD_DATA_DIR";
pub const USERNAME_VAR: &str = "EV_DASHBOARD_USERNAME";
pub const PASSWORD_VAR: &str = "EV_DASHBOARD_PASSWORD";

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The single account accepted by the login form. Not a security boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Credentials {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub data: DataPaths,
    pub credentials: Credentials,
}

impl AppConfig {
    /// Read `.env` (if any) and the process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::resolve(|name| std::env::var(name).ok(), &default_data_dir())
    }

    /// Build the configuration from a variable lookup, falling back to
    /// `default_dir` for the data files.
    pub fn resolve(var: impl Fn(&str) -> Option<String>, default_dir: &Path) -> Self {
        let set = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let data_dir = set(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_dir.to_path_buf());

        let defaults = Credentials::default();
        let credentials = Credentials {
            username: set(USERNAME_VAR).unwrap_or(defaults.username),
            password: set(PASSWORD_VAR).unwrap_or(defaults.password),
        };

        AppConfig {
            data: DataPaths::in_dir(&data_dir),
            data_dir,
            credentials,
        }
    }

    /// Point the data files at another directory.
    pub fn with_data_dir(&self, dir: &Path) -> Self {
        AppConfig {
            data_dir: dir.to_path_buf(),
            data: DataPaths::in_dir(dir),
            credentials: self.credentials.clone(),
        }
    }
}

/// The directory holding the executable, else the working directory.
fn default_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
