//! Verified-copy orchestration.
//!
//! This module ties the digest stream and the byte copier together:
//! - `copy_with_verification`: hash source, copy bytes, hash destination,
//!   compare, then propagate timestamps and optionally delete the source
//! - `copy_directory_contents`: recursive tree copy, flattening the root
//! - `copy_directory`: recursive tree copy, preserving the root folder name

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::fs_ops;
use crate::hash::hash_file;
use crate::model::{CopyOptions, FileRole};
use crate::progress::CopyObserver;
use std::fs;
use std::io;
use std::path::Path;

fn status(observer: Option<&dyn CopyObserver>, message: &str) {
    if let Some(observer) = observer {
        observer.on_status(message);
    }
}

/// Copy a single file and verify the result by re-hashing both endpoints.
///
/// The pipeline is sequential: hash source, copy bytes, hash destination,
/// compare digests case-insensitively. On a verified match the source's
/// modification/access times are propagated onto the destination and, when
/// `options.delete_source_if_verified` is set, the source is removed.
///
/// # Returns
/// `Ok(true)` when the digests match, `Ok(false)` on a checksum mismatch.
/// A mismatch is a reportable outcome, not a fault; the destination is left
/// in place for inspection and the source is never deleted.
///
/// # Errors
/// `NotFound` if the source is missing, `DestinationExists` if the
/// destination exists and overwrite is off, `InvalidPath` if the source is
/// not a regular file, `Read`/`Write` on I/O faults, and `Cancelled` on
/// cancellation (the destination's content is then undefined).
pub fn copy_with_verification(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
    cancel: &CancelToken,
    observer: Option<&dyn CopyObserver>,
) -> Result<bool, EngineError> {
    match fs::metadata(source) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(EngineError::InvalidPath {
                    path: source.to_path_buf(),
                    reason: "Source is not a regular file".to_string(),
                });
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EngineError::NotFound {
                path: source.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(EngineError::Read {
                path: source.to_path_buf(),
                source: e,
            });
        }
    }

    if destination.exists() && !options.overwrite {
        return Err(EngineError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }

    status(observer, "Calculating source hash...");
    let source_digest = hash_file(
        source,
        options.hash_algorithm,
        FileRole::Source,
        cancel,
        observer,
        options.enable_progress,
    )?;

    status(observer, "Copying file...");
    fs_ops::copy_bytes(source, destination, cancel, observer, options.enable_progress)?;

    status(observer, "Calculating destination hash...");
    let destination_digest = hash_file(
        destination,
        options.hash_algorithm,
        FileRole::Destination,
        cancel,
        observer,
        options.enable_progress,
    )?;

    let matched = source_digest.matches(&destination_digest);

    if matched {
        fs_ops::propagate_timestamps(source, destination)?;

        if options.delete_source_if_verified {
            fs::remove_file(source).map_err(|e| EngineError::Delete {
                path: source.to_path_buf(),
                source: e,
            })?;
        }
    }

    status(
        observer,
        if matched {
            "File copied and verified."
        } else {
            "Checksum mismatch."
        },
    );

    Ok(matched)
}

/// Copy the files contained in a directory into a destination directory.
///
/// The root directory itself is flattened: a file at
/// `source_dir/sub/x.txt` lands at `destination_dir/sub/x.txt`. The
/// destination directory and any intermediate directories are created on
/// demand. Every file goes through `copy_with_verification`; the first
/// checksum mismatch fails the whole operation with `VerificationFailed`
/// naming the offending pair - no partial-failure aggregation.
///
/// # Errors
/// `NotFound` if the source directory is missing, `InvalidPath` if it is
/// not a directory, `VerificationFailed` on the first mismatch, plus any
/// fault propagated from the per-file pipeline.
pub fn copy_directory_contents(
    source_dir: &Path,
    destination_dir: &Path,
    options: &CopyOptions,
    cancel: &CancelToken,
    observer: Option<&dyn CopyObserver>,
) -> Result<(), EngineError> {
    match fs::metadata(source_dir) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(EngineError::InvalidPath {
                    path: source_dir.to_path_buf(),
                    reason: "Source is not a directory".to_string(),
                });
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EngineError::NotFound {
                path: source_dir.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(EngineError::EnumerationFailed {
                path: source_dir.to_path_buf(),
                source: e,
            });
        }
    }

    fs::create_dir_all(destination_dir).map_err(|e| EngineError::DirectoryCreationFailed {
        path: destination_dir.to_path_buf(),
        source: e,
    })?;

    for file in fs_ops::collect_files(source_dir)? {
        cancel.check()?;

        let relative = file
            .strip_prefix(source_dir)
            .map_err(|_| EngineError::InvalidPath {
                path: file.clone(),
                reason: "Enumerated file is outside the source directory".to_string(),
            })?;
        let target = destination_dir.join(relative);
        fs_ops::ensure_parent_dir_exists(&target)?;

        let matched = copy_with_verification(&file, &target, options, cancel, observer)?;
        if !matched {
            return Err(EngineError::VerificationFailed {
                source_path: file,
                destination_path: target,
            });
        }
    }

    Ok(())
}

/// Copy an entire directory, preserving the root folder name.
///
/// The content lands one level deeper than with `copy_directory_contents`:
/// `copy_directory("/a/b", "/c")` places files under `/c/b/...`. Trailing
/// separators on the source path are ignored when taking its final
/// component.
///
/// # Errors
/// `InvalidPath` if the source path has no final component (e.g. `/` or a
/// path ending in `..`), plus everything `copy_directory_contents` returns.
pub fn copy_directory(
    source_dir: &Path,
    destination_dir: &Path,
    options: &CopyOptions,
    cancel: &CancelToken,
    observer: Option<&dyn CopyObserver>,
) -> Result<(), EngineError> {
    let root_name = source_dir.file_name().ok_or_else(|| EngineError::InvalidPath {
        path: source_dir.to_path_buf(),
        reason: "Source directory has no final path component".to_string(),
    })?;

    let new_root = destination_dir.join(root_name);
    copy_directory_contents(source_dir, &new_root, options, cancel, observer)
}
