//! # Mirror Engine - Verified File Copy Library
//!
//! A headless engine for integrity-verified copying of files and directory
//! trees. Designed as the foundation for multiple front ends (CLI,
//! automation).
//!
//! ## Overview
//!
//! Every copy is followed by an independent re-hash of both endpoints:
//! the engine hashes the source, streams the bytes across, hashes the
//! destination, and reports success only when the two digests match.
//! It features:
//! - Streaming I/O with bounded memory (fixed-size chunks)
//! - Incremental hashing over a closed set of algorithms
//!   (MD5, SHA-1, SHA-256, SHA-384, SHA-512)
//! - Progress and status reporting via an observer trait
//!   (decoupled from any UI technology)
//! - Cooperative cancellation checked at chunk granularity
//! - Recursive directory-tree copy built atop single-file verified copy
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{copy_with_verification, CancelToken, CopyOptions};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CopyOptions::default().with_overwrite(true);
//! let cancel = CancelToken::new();
//!
//! let matched = copy_with_verification(
//!     Path::new("data/report.bin"),
//!     Path::new("/mnt/backup/report.bin"),
//!     &options,
//!     &cancel,
//!     None,
//! )?;
//!
//! if matched {
//!     println!("copy verified");
//! } else {
//!     println!("checksum mismatch");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Copy options and the source/destination role tag
//! - **error**: Error types and handling
//! - **cancel**: Cooperative cancellation token
//! - **hash**: Algorithm selection and streaming digest computation
//! - **fs_ops**: Low-level filesystem operations
//! - **copier**: Verified-copy orchestration and directory traversal
//! - **progress**: Observer trait for progress and status events

pub mod model;
pub mod error;
pub mod cancel;
pub mod hash;
pub mod fs_ops;
pub mod copier;
pub mod progress;

// Re-export main types and functions
pub use model::{CopyOptions, FileRole};
pub use error::EngineError;
pub use cancel::CancelToken;
pub use hash::{hash_file, Digest, HashAlgorithm};
pub use copier::{copy_directory, copy_directory_contents, copy_with_verification};
pub use progress::CopyObserver;
