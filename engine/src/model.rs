//! Core data model for verified-copy operations.
//!
//! This module defines the option set passed into every operation and the
//! role tag attached to hash-progress events:
//! - CopyOptions: per-invocation behavior flags
//! - FileRole: which side of a verified copy a hash event refers to

use crate::hash::HashAlgorithm;

/// Options controlling a verified-copy invocation.
///
/// Constructed once per invocation and passed by shared reference through
/// the whole operation tree; nothing here is mutated mid-flight.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Whether an existing destination file may be replaced
    pub overwrite: bool,

    /// Digest algorithm used to verify the copy
    pub hash_algorithm: HashAlgorithm,

    /// Whether fractional progress events are emitted
    ///
    /// Status events are always delivered to an attached observer;
    /// this flag only gates the per-chunk percent callbacks.
    pub enable_progress: bool,

    /// Whether the source file is deleted after a verified copy
    ///
    /// The deletion happens if and only if the digest comparison succeeded.
    pub delete_source_if_verified: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        CopyOptions {
            overwrite: false,
            hash_algorithm: HashAlgorithm::Sha256,
            enable_progress: false,
            delete_source_if_verified: false,
        }
    }
}

impl CopyOptions {
    /// Set whether an existing destination may be replaced
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the digest algorithm used for verification
    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Enable per-chunk progress events
    #[must_use]
    pub fn with_enable_progress(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// Delete the source file once the copy has verified
    #[must_use]
    pub fn with_delete_source_if_verified(mut self, delete: bool) -> Self {
        self.delete_source_if_verified = delete;
        self
    }
}

/// Which side of a verified copy a hash-progress event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// The file being read from
    Source,
    /// The file being written to
    Destination,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRole::Source => write!(f, "source"),
            FileRole::Destination => write!(f, "destination"),
        }
    }
}
