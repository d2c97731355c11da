//! Low-level filesystem operations.
//!
//! This module provides:
//! - Chunked byte copying with progress events and per-chunk cancellation
//! - Recursive enumeration of the files under a directory
//! - Parent-directory creation
//! - Timestamp propagation from source to destination

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::progress::CopyObserver;
use filetime::FileTime;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Chunk size for the streaming byte copy.
const COPY_CHUNK_SIZE: usize = 80 * 1024;

/// Stream a file from `source` to `destination` in fixed-size chunks.
///
/// The destination is created (truncating any existing file); callers are
/// responsible for overwrite/existence checks before invoking this. After
/// each written chunk, when `report_progress` is set, the observer receives
/// a copy-progress percent computed against the source length read up front.
///
/// # Returns
/// Number of bytes copied
///
/// # Errors
/// Returns `Read`/`Write` on I/O failure and `Cancelled` when the token is
/// signaled. Cancellation leaves a partial destination file behind; any
/// cleanup policy belongs to the caller.
pub fn copy_bytes(
    source: &Path,
    destination: &Path,
    cancel: &CancelToken,
    observer: Option<&dyn CopyObserver>,
    report_progress: bool,
) -> Result<u64, EngineError> {
    let mut src_file = fs::File::open(source).map_err(|e| EngineError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let total = src_file
        .metadata()
        .map_err(|e| EngineError::Read {
            path: source.to_path_buf(),
            source: e,
        })?
        .len();

    let mut dst_file = fs::File::create(destination).map_err(|e| EngineError::Write {
        path: destination.to_path_buf(),
        source: e,
    })?;

    let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
    let mut copied: u64 = 0;

    loop {
        cancel.check()?;

        let read = src_file.read(&mut buffer).map_err(|e| EngineError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        if read == 0 {
            break;
        }

        dst_file
            .write_all(&buffer[..read])
            .map_err(|e| EngineError::Write {
                path: destination.to_path_buf(),
                source: e,
            })?;
        copied += read as u64;

        if report_progress && total > 0 {
            if let Some(observer) = observer {
                observer.on_copy_progress(copied as f64 / total as f64 * 100.0);
            }
        }
    }

    Ok(copied)
}

/// Enumerate all files (not directories) under `root`, recursively.
///
/// Enumeration order is unspecified; every file appears exactly once.
///
/// # Errors
/// Returns `NotFound` if a directory vanishes mid-walk and
/// `EnumerationFailed` on any other read-dir failure.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, EngineError> {
    fn recurse(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), EngineError> {
        let entries = fs::read_dir(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                EngineError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                EngineError::EnumerationFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| EngineError::EnumerationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
            let metadata = entry.metadata().map_err(|e| EngineError::EnumerationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

            if metadata.is_dir() {
                recurse(&entry.path(), files)?;
            } else {
                files.push(entry.path());
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    recurse(root, &mut files)?;
    Ok(files)
}

/// Ensure the parent directory of a path exists, creating it if necessary.
///
/// # Errors
/// Returns `DirectoryCreationFailed` if the parent cannot be created or
/// exists as something other than a directory.
pub fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    match fs::metadata(parent) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(EngineError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "Parent path exists but is not a directory",
            ),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(EngineError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        }),
    }
}

/// Copy the modification and access times of `source` onto `destination`.
///
/// Creation time is not propagated: there is no portable API for setting a
/// file's birth time, so it is left to the destination filesystem.
///
/// # Errors
/// Returns `Read` if source metadata cannot be read and `Write` if the
/// times cannot be set on the destination.
pub fn propagate_timestamps(source: &Path, destination: &Path) -> Result<(), EngineError> {
    let metadata = fs::metadata(source).map_err(|e| EngineError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let mtime = FileTime::from_last_modification_time(&metadata);
    let atime = FileTime::from_last_access_time(&metadata);

    filetime::set_file_times(destination, atime, mtime).map_err(|e| EngineError::Write {
        path: destination.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileRole;
    use std::sync::Mutex;

    struct Recorder {
        copy_events: Mutex<Vec<f64>>,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder {
                copy_events: Mutex::new(Vec::new()),
            }
        }
    }

    impl CopyObserver for Recorder {
        fn on_copy_progress(&self, percent: f64) {
            self.copy_events
                .lock()
                .expect("Failed to lock events")
                .push(percent);
        }

        fn on_hash_progress(&self, _role: FileRole, _percent: f64) {}

        fn on_status(&self, _message: &str) {}
    }

    #[test]
    fn test_copy_bytes_copies_content() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = dir.path().join("source.txt");
        let dst = dir.path().join("dest.txt");
        fs::write(&src, b"test content").expect("Failed to write source");

        let bytes = copy_bytes(&src, &dst, &CancelToken::new(), None, false)
            .expect("Failed to copy");
        assert_eq!(bytes, 12);
        assert_eq!(
            fs::read_to_string(&dst).expect("Failed to read dest"),
            "test content"
        );
    }

    #[test]
    fn test_copy_bytes_reports_progress() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = dir.path().join("source.bin");
        let dst = dir.path().join("dest.bin");
        fs::write(&src, vec![1u8; COPY_CHUNK_SIZE + 1000]).expect("Failed to write source");

        let recorder = Recorder::new();
        copy_bytes(&src, &dst, &CancelToken::new(), Some(&recorder), true)
            .expect("Failed to copy");

        let events = recorder.copy_events.lock().expect("Failed to lock events");
        assert!(events.len() >= 2);
        assert!(events.windows(2).all(|w| w[0] <= w[1]));
        let last = events.last().expect("Expected at least one event");
        assert!((last - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_copy_bytes_cancelled() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = dir.path().join("source.txt");
        let dst = dir.path().join("dest.txt");
        fs::write(&src, b"data").expect("Failed to write source");

        let cancel = CancelToken::new();
        cancel.cancel();
        let result = copy_bytes(&src, &dst, &cancel, None, false);
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_collect_files_flat() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("a.txt"), b"a").expect("Failed to write a");
        fs::write(dir.path().join("b.txt"), b"b").expect("Failed to write b");

        let files = collect_files(dir.path()).expect("Failed to enumerate");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_files_nested() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sub = dir.path().join("sub").join("deeper");
        fs::create_dir_all(&sub).expect("Failed to create subdirs");
        fs::write(dir.path().join("top.txt"), b"1").expect("Failed to write top");
        fs::write(sub.join("leaf.txt"), b"2").expect("Failed to write leaf");

        let files = collect_files(dir.path()).expect("Failed to enumerate");
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.ends_with("top.txt")));
        assert!(files.iter().any(|f| f.ends_with("sub/deeper/leaf.txt")));
    }

    #[test]
    fn test_collect_files_missing_root() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = collect_files(&dir.path().join("nonexistent"));
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn test_ensure_parent_dir_exists() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("sub").join("file.txt");

        ensure_parent_dir_exists(&path).expect("Failed to create parent");
        assert!(path.parent().expect("Expected a parent").exists());
    }

    #[test]
    fn test_propagate_timestamps() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = dir.path().join("source.txt");
        let dst = dir.path().join("dest.txt");
        fs::write(&src, b"content").expect("Failed to write source");
        fs::write(&dst, b"content").expect("Failed to write dest");

        let past = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&src, past).expect("Failed to set source mtime");

        propagate_timestamps(&src, &dst).expect("Failed to propagate timestamps");

        let dst_meta = fs::metadata(&dst).expect("Failed to read dest metadata");
        assert_eq!(FileTime::from_last_modification_time(&dst_meta), past);
    }
}
