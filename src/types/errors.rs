use std::fmt;

// === NavigationError ===

/// Errors raised while turning a URL into something the browser can show.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// No virtual website is registered for the URL.
    UnresolvedUrl(String),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::UnresolvedUrl(url) => write!(f, "URL could not be resolved: {}", url),
        }
    }
}

impl std::error::Error for NavigationError {}

// === PersistenceError ===

/// Errors related to the persisted browser state.
#[derive(Debug)]
pub enum PersistenceError {
    /// Stored state is missing pieces or could not be read back.
    ReadFailure(String),
    /// The store rejected a write.
    WriteFailure(String),
    /// Failed to serialize or deserialize the browser state.
    SerializationError(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::ReadFailure(msg) => write!(f, "Persistence read failure: {}", msg),
            PersistenceError::WriteFailure(msg) => {
                write!(f, "Persistence write failure: {}", msg)
            }
            PersistenceError::SerializationError(msg) => {
                write!(f, "Persistence serialization error: {}", msg)
            }
            PersistenceError::DatabaseError(msg) => {
                write!(f, "Persistence database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
