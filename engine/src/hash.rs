//! Algorithm selection and streaming digest computation.
//!
//! This module provides:
//! - A closed set of digest algorithms (MD5, SHA-1, SHA-256, SHA-384,
//!   SHA-512) with strict name parsing
//! - An incremental-hasher trait with per-algorithm backends
//! - `hash_file`: chunked digest computation with role-tagged progress
//!   events and per-chunk cancellation checks

use crate::cancel::CancelToken;
use crate::error::EngineError;
use crate::model::FileRole;
use crate::progress::CopyObserver;
use sha1::Digest as _;
use sha2::Digest as _;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Chunk size for streaming digest computation.
const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// Supported digest algorithms.
///
/// The set is closed: unrecognized names fail to parse rather than being
/// accepted and resolved later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// MD5 (legacy, kept for compatibility with existing digests)
    Md5,
    /// SHA-1 (legacy, kept for compatibility with existing digests)
    Sha1,
    /// SHA-256 (default)
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha256
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha1 => write!(f, "sha1"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha384 => write!(f, "sha384"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha384" | "sha-384" => Ok(Self::Sha384),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(EngineError::UnsupportedAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// A computed digest: the algorithm that produced it plus its hex rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    algorithm: HashAlgorithm,
    hex: String,
}

impl Digest {
    /// Create a digest value from an algorithm and a hex string.
    pub fn new(algorithm: HashAlgorithm, hex: String) -> Self {
        Digest { algorithm, hex }
    }

    /// Get the algorithm that produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Get the lowercase hex representation.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Compare against another digest, ignoring hex case.
    pub fn matches(&self, other: &Digest) -> bool {
        self.hex.eq_ignore_ascii_case(&other.hex)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

/// Trait for feeding bytes into a digest algorithm incrementally.
pub trait IncrementalHasher {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize and return the digest
    fn finalize(self: Box<Self>) -> Digest;
}

/// MD5 hasher (backed by the md5 crate)
struct Md5Hasher {
    context: md5::Context,
}

impl IncrementalHasher for Md5Hasher {
    fn update(&mut self, data: &[u8]) {
        self.context.consume(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        let digest = self.context.compute();
        Digest::new(HashAlgorithm::Md5, format!("{:x}", digest))
    }
}

/// SHA-1 hasher (backed by the sha1 crate)
struct Sha1Hasher {
    hasher: sha1::Sha1,
}

impl IncrementalHasher for Sha1Hasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::new(HashAlgorithm::Sha1, format!("{:x}", self.hasher.finalize()))
    }
}

/// SHA-256 hasher (backed by the sha2 crate)
struct Sha256Hasher {
    hasher: sha2::Sha256,
}

impl IncrementalHasher for Sha256Hasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::new(
            HashAlgorithm::Sha256,
            format!("{:x}", self.hasher.finalize()),
        )
    }
}

/// SHA-384 hasher (backed by the sha2 crate)
struct Sha384Hasher {
    hasher: sha2::Sha384,
}

impl IncrementalHasher for Sha384Hasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::new(
            HashAlgorithm::Sha384,
            format!("{:x}", self.hasher.finalize()),
        )
    }
}

/// SHA-512 hasher (backed by the sha2 crate)
struct Sha512Hasher {
    hasher: sha2::Sha512,
}

impl IncrementalHasher for Sha512Hasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::new(
            HashAlgorithm::Sha512,
            format!("{:x}", self.hasher.finalize()),
        )
    }
}

/// Create a new incremental hasher for the given algorithm.
pub fn hasher_for(algorithm: HashAlgorithm) -> Box<dyn IncrementalHasher> {
    match algorithm {
        HashAlgorithm::Md5 => Box::new(Md5Hasher {
            context: md5::Context::new(),
        }),
        HashAlgorithm::Sha1 => Box::new(Sha1Hasher {
            hasher: sha1::Sha1::default(),
        }),
        HashAlgorithm::Sha256 => Box::new(Sha256Hasher {
            hasher: sha2::Sha256::default(),
        }),
        HashAlgorithm::Sha384 => Box::new(Sha384Hasher {
            hasher: sha2::Sha384::default(),
        }),
        HashAlgorithm::Sha512 => Box::new(Sha512Hasher {
            hasher: sha2::Sha512::default(),
        }),
    }
}

/// Compute the digest of a file by streaming it in fixed-size chunks.
///
/// The resulting digest equals the algorithm's whole-file hash for every
/// input, including zero-length files and files whose length is an exact
/// multiple of the chunk size.
///
/// # Arguments
/// * `path` - File to digest
/// * `algorithm` - Digest algorithm
/// * `role` - Tag attached to emitted hash-progress events
/// * `cancel` - Cancellation token, checked once per chunk
/// * `observer` - Optional progress/status sink
/// * `report_progress` - Whether per-chunk percent events are emitted
///
/// # Errors
/// Returns `NotFound` if the path does not exist, `Read` on I/O failure,
/// and `Cancelled` the moment cancellation is observed. A cancelled call
/// never returns a partial digest.
pub fn hash_file(
    path: &Path,
    algorithm: HashAlgorithm,
    role: FileRole,
    cancel: &CancelToken,
    observer: Option<&dyn CopyObserver>,
    report_progress: bool,
) -> Result<Digest, EngineError> {
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            EngineError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let total = file
        .metadata()
        .map_err(|e| EngineError::Read {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();

    let mut hasher = hasher_for(algorithm);
    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    let mut digested: u64 = 0;

    loop {
        cancel.check()?;

        let read = file.read(&mut buffer).map_err(|e| EngineError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if read == 0 {
            break;
        }

        hasher.update(&buffer[..read]);
        digested += read as u64;

        if report_progress && total > 0 {
            if let Some(observer) = observer {
                observer.on_hash_progress(role, digested as f64 / total as f64 * 100.0);
            }
        }
    }

    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    struct Recorder {
        hash_events: Mutex<Vec<(FileRole, f64)>>,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder {
                hash_events: Mutex::new(Vec::new()),
            }
        }
    }

    impl CopyObserver for Recorder {
        fn on_copy_progress(&self, _percent: f64) {}

        fn on_hash_progress(&self, role: FileRole, percent: f64) {
            self.hash_events
                .lock()
                .expect("Failed to lock events")
                .push((role, percent));
        }

        fn on_status(&self, _message: &str) {}
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    fn digest_of(path: &Path, algorithm: HashAlgorithm) -> Digest {
        hash_file(
            path,
            algorithm,
            FileRole::Source,
            &CancelToken::new(),
            None,
            false,
        )
        .expect("Failed to hash file")
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(HashAlgorithm::Md5.to_string(), "md5");
        assert_eq!(HashAlgorithm::Sha1.to_string(), "sha1");
        assert_eq!(HashAlgorithm::Sha256.to_string(), "sha256");
        assert_eq!(HashAlgorithm::Sha384.to_string(), "sha384");
        assert_eq!(HashAlgorithm::Sha512.to_string(), "sha512");
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!(
            "SHA-1".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha1
        );
        assert_eq!(
            "Sha256".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha256
        );
        assert_eq!(
            "sha-384".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha384
        );
        assert_eq!(
            "SHA512".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha512
        );
    }

    #[test]
    fn test_algorithm_parse_rejects_unknown_names() {
        let err = "crc32".parse::<HashAlgorithm>().unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedAlgorithm { ref name } if name == "crc32"
        ));
    }

    #[test]
    fn test_md5_known_vector() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "hello.txt", b"hello");
        let digest = digest_of(&path, HashAlgorithm::Md5);
        assert_eq!(digest.hex(), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_sha1_known_vector() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "hello.txt", b"hello");
        let digest = digest_of(&path, HashAlgorithm::Sha1);
        assert_eq!(digest.hex(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn test_sha256_known_vector() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "hello.txt", b"hello");
        let digest = digest_of(&path, HashAlgorithm::Sha256);
        assert_eq!(
            digest.hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha384_and_sha512_lengths() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "hello.txt", b"hello");

        let sha384 = digest_of(&path, HashAlgorithm::Sha384);
        assert_eq!(sha384.hex().len(), 96);
        assert_eq!(sha384.hex(), digest_of(&path, HashAlgorithm::Sha384).hex());

        let sha512 = digest_of(&path, HashAlgorithm::Sha512);
        assert_eq!(sha512.hex().len(), 128);
        assert_eq!(sha512.hex(), digest_of(&path, HashAlgorithm::Sha512).hex());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "empty.bin", b"");
        let digest = digest_of(&path, HashAlgorithm::Sha256);
        assert_eq!(
            digest.hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_chunk_aligned_length_matches_one_shot_digest() {
        // Two exact chunks: the streamed digest must equal the digest of
        // the same bytes fed in a single update.
        let content = vec![0xA5u8; HASH_CHUNK_SIZE * 2];
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "aligned.bin", &content);

        let streamed = digest_of(&path, HashAlgorithm::Sha256);
        let mut one_shot = hasher_for(HashAlgorithm::Sha256);
        one_shot.update(&content);
        assert_eq!(streamed.hex(), one_shot.finalize().hex());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = digest_err(&dir.path().join("absent.bin"));
        assert!(matches!(result, EngineError::NotFound { .. }));
    }

    fn digest_err(path: &Path) -> EngineError {
        hash_file(
            path,
            HashAlgorithm::Sha256,
            FileRole::Source,
            &CancelToken::new(),
            None,
            false,
        )
        .unwrap_err()
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "data.bin", b"some data");

        let cancel = CancelToken::new();
        cancel.cancel();
        let result = hash_file(
            &path,
            HashAlgorithm::Sha256,
            FileRole::Source,
            &cancel,
            None,
            false,
        );
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_progress_events_reach_one_hundred() {
        let content = vec![7u8; HASH_CHUNK_SIZE * 3 + 100];
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_file(&dir, "big.bin", &content);

        let recorder = Recorder::new();
        hash_file(
            &path,
            HashAlgorithm::Sha256,
            FileRole::Destination,
            &CancelToken::new(),
            Some(&recorder),
            true,
        )
        .expect("Failed to hash file");

        let events = recorder.hash_events.lock().expect("Failed to lock events");
        assert!(!events.is_empty());
        assert!(events.iter().all(|(role, _)| *role == FileRole::Destination));
        assert!(events.windows(2).all(|w| w[0].1 <= w[1].1));
        let last = events.last().expect("Expected at least one event").1;
        assert!((last - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_digest_matches_is_case_insensitive() {
        let a = Digest::new(HashAlgorithm::Sha256, "ABC123".to_string());
        let b = Digest::new(HashAlgorithm::Sha256, "abc123".to_string());
        assert!(a.matches(&b));

        let c = Digest::new(HashAlgorithm::Sha256, "abc124".to_string());
        assert!(!a.matches(&c));
    }
}
