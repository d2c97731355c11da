//! Error types for the verified-copy engine.
//!
//! The primary error type is `EngineError`. A checksum mismatch on a
//! single-file copy is NOT an error: `copy_with_verification` reports it as
//! `Ok(false)`. Only directory-level operations surface a mismatch as
//! `EngineError::VerificationFailed`, because they have no boolean channel.

use std::error::Error;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Errors that can occur during a verified-copy operation.
///
/// Every variant carrying an `io::Error` keeps it as a source so callers
/// can inspect the underlying OS error.
#[derive(Debug)]
pub enum EngineError {
    /// Source file or directory does not exist
    NotFound { path: PathBuf },

    /// Destination file exists and overwrite was not permitted
    DestinationExists { path: PathBuf },

    /// Digest algorithm name is not recognized
    UnsupportedAlgorithm { name: String },

    /// Failed to read from a file
    Read { path: PathBuf, source: io::Error },

    /// Failed to write to a file
    Write { path: PathBuf, source: io::Error },

    /// Failed to delete a file
    Delete { path: PathBuf, source: io::Error },

    /// Failed to enumerate a directory
    EnumerationFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Path is structurally unusable for the requested operation
    InvalidPath { path: PathBuf, reason: String },

    /// Cooperative cancellation was observed
    Cancelled,

    /// Source and destination digests differ (directory-level operations)
    VerificationFailed {
        source_path: PathBuf,
        destination_path: PathBuf,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "File or directory not found: {}", path.display())
            }
            Self::DestinationExists { path } => {
                write!(
                    f,
                    "Destination exists and overwrite is not enabled: {}",
                    path.display()
                )
            }
            Self::UnsupportedAlgorithm { name } => {
                write!(f, "Unsupported hash algorithm: {}", name)
            }
            Self::Read { path, .. } => {
                write!(f, "Failed to read file: {}", path.display())
            }
            Self::Write { path, .. } => {
                write!(f, "Failed to write file: {}", path.display())
            }
            Self::Delete { path, .. } => {
                write!(f, "Failed to delete file: {}", path.display())
            }
            Self::EnumerationFailed { path, .. } => {
                write!(f, "Failed to enumerate directory: {}", path.display())
            }
            Self::DirectoryCreationFailed { path, .. } => {
                write!(f, "Failed to create directory: {}", path.display())
            }
            Self::InvalidPath { path, reason } => {
                write!(f, "Invalid path: {} ({})", path.display(), reason)
            }
            Self::Cancelled => {
                write!(f, "Operation cancelled")
            }
            Self::VerificationFailed {
                source_path,
                destination_path,
            } => {
                write!(
                    f,
                    "Checksum verification failed: {} -> {}",
                    source_path.display(),
                    destination_path.display()
                )
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Delete { source, .. }
            | Self::EnumerationFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl EngineError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Delete { source, .. }
            | Self::EnumerationFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => {
                source.raw_os_error().map(|e| e as u32)
            }
            _ => None,
        }
    }
}
