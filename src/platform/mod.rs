// Platform-specific locations for settings and the state database.
//
// Linux:   $XDG_CONFIG_HOME/aurora-browser, $XDG_DATA_HOME/aurora-browser
// macOS:   ~/Library/Application Support/AuroraBrowser (both)
// Windows: %APPDATA%/AuroraBrowser (both)
//
// AURORA_BROWSER_DATA_DIR overrides the data directory everywhere.

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides [`get_data_dir`].
pub const DATA_DIR_ENV: &str = "AURORA_BROWSER_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "linux")]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("aurora-browser"),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join("aurora-browser"),
    }
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("AuroraBrowser")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("AuroraBrowser")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        home_dir().join(".aurora-browser")
    }
}

/// Directory holding the state database.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}
