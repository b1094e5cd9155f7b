//! On-disk decoded-value cache.
//!
//! One file per decoded layer, named `<hex-digest>.bin`, holding the raw
//! float array in host byte order with no header. The digest covers the
//! encoded payload length and bytes, so a re-download of identical data hits
//! the same entry. Writers go through a temporary file and an atomic rename;
//! the directory may be shared between processes.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// The decoded-value cache directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Open (creating if needed) a cache directory.
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stable digest of an encoded payload: SHA-256 over the length
    /// followed by the bytes, rendered as lowercase hex.
    pub fn digest(payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update((payload.len() as u64).to_be_bytes());
        hasher.update(payload);
        let mut hex = String::with_capacity(64);
        for byte in hasher.finalize() {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }

    fn path_for(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("{digest}.bin"))
    }

    /// Load a cached float array. Missing, empty, or odd-sized entries
    /// return `None` (the caller re-decodes).
    pub fn load(&self, digest: &str) -> Option<Vec<f32>> {
        let bytes = fs::read(self.path_for(digest)).ok()?;
        if bytes.is_empty() || bytes.len() % 4 != 0 {
            return None;
        }
        let mut out = Vec::with_capacity(bytes.len() / 4);
        for chunk in bytes.chunks_exact(4) {
            out.push(f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        Some(out)
    }

    /// Write a decoded float array, atomically.
    pub fn store(&self, digest: &str, data: &[f32]) -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        for value in data {
            tmp.write_all(&value.to_ne_bytes())?;
        }
        tmp.persist(self.path_for(digest))
            .map_err(|e| e.error)?;
        debug!(digest, len = data.len(), "cached decoded layer");
        Ok(())
    }

    /// Sweep the cache directory: drop entries older than `max_age`, then
    /// drop least-recently-modified entries until the total size is at most
    /// `max_bytes`. Returns the number of files removed.
    pub fn expire(&self, max_age: Duration, max_bytes: u64) -> usize {
        let now = SystemTime::now();
        let mut entries: Vec<(PathBuf, SystemTime, u64)> = Vec::new();
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return 0;
        };
        for entry in read_dir.flatten() {
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let mtime = meta.modified().unwrap_or(now);
            entries.push((entry.path(), mtime, meta.len()));
        }

        let mut removed = 0usize;
        entries.retain(|(path, mtime, _)| {
            let too_old = now
                .duration_since(*mtime)
                .map(|age| age > max_age)
                .unwrap_or(false);
            if too_old && fs::remove_file(path).is_ok() {
                removed += 1;
                false
            } else {
                true
            }
        });

        let mut total: u64 = entries.iter().map(|&(_, _, len)| len).sum();
        if total > max_bytes {
            entries.sort_by_key(|&(_, mtime, _)| mtime);
            for (path, _, len) in entries {
                if total <= max_bytes {
                    break;
                }
                if fs::remove_file(&path).is_ok() {
                    total -= len;
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            info!(dir = %self.dir.display(), removed, "cache sweep");
        }
        removed
    }
}
