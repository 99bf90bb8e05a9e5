// SPDX-License-Identifier: GPL-3.0-only

use storage_contracts::{StorageError, StorageErrorKind};
use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required tool not found in PATH: {0}")]
    ToolNotFound(String),

    #[error("Command failed: {command}; stderr: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;

impl From<SysError> for StorageError {
    fn from(error: SysError) -> Self {
        let kind = match &error {
            SysError::Io(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
                StorageErrorKind::PermissionDenied
            }
            SysError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                StorageErrorKind::NotFound
            }
            SysError::Io(_) => StorageErrorKind::Internal,
            SysError::ToolNotFound(_) => StorageErrorKind::Unavailable,
            SysError::CommandFailed { stderr, .. } if stderr.contains("busy") => {
                StorageErrorKind::Busy
            }
            SysError::CommandFailed { .. } => StorageErrorKind::CommandFailed,
        };
        StorageError::new(kind, error.to_string())
    }
}
