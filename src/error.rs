//! Error types for ddclient-conf.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ddclient-conf.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration error types.
///
/// Parsing text never fails; every variant here comes from file access or
/// from the editing operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No configuration file at the requested path or any default location.
    #[error("ddclient.conf not found: {0}")]
    NotFound(String),

    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Domain entries need a display name.
    #[error("Domain name is required")]
    EmptyDomainName,

    /// Domain index outside the current list.
    #[error("No domain at index {index} (have {len})")]
    DomainIndex { index: usize, len: usize },

    /// No domain with the given name.
    #[error("Domain not found: {0}")]
    UnknownDomain(String),

    /// Key is not one of the recognized global settings.
    #[error("Unknown global key: {0}")]
    UnknownKey(String),

    /// IO error on the MCP stdio transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Classify an I/O error raised while reading `path`.
    pub(crate) fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.display().to_string())
        } else {
            ConfigError::Read { path, source }
        }
    }

    /// Whether callers may recover by starting from an empty configuration.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = ConfigError::from_read("/nope", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_permission_denied_maps_to_read() {
        let err = ConfigError::from_read(
            "/etc/ddclient.conf",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().starts_with("Failed to read /etc/ddclient.conf"));
    }
}
