//! Platform-specific session and config directories.

use crate::error::ConfigError;
use std::path::PathBuf;

/// The user's polarmap config directory, e.g. `~/.config/polarmap`.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("polarmap")
}

/// The directory user sessions are stored in.
pub fn user_sessions_dir() -> PathBuf {
    user_config_dir().join("sessions")
}

/// Ensure the user sessions directory exists, returning it.
pub fn ensure_user_sessions_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_sessions_dir();
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::write_file(&dir, e))?;
    Ok(dir)
}

/// List the session files in the user sessions directory, sorted by name.
pub fn list_user_sessions() -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(user_sessions_dir()) else {
        return Vec::new();
    };
    let mut sessions: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("toml"))
        .collect();
    sessions.sort();
    sessions
}
