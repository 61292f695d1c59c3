//! Completion cache
//!
//! An opaque byte store keyed by registry identity (see
//! [`crate::parser::RegistryRef::cache_key`]). `re-cache` and `list` write the
//! evaluated registry tree here; shell completion only ever reads it.
//!
//! `re-cache` also records the detected system, so completion can compute
//! the tree's key without running the evaluator.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::Result;

/// Key under which the last detected system is kept
pub const SYSTEM_KEY: &str = "current-system";

/// Trait for byte stores the completion cache can live in
pub trait ByteCache {
    /// Read the bytes stored under `key`, `None` on a miss.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value.
    fn put_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Cache storing one file per key below a root directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ByteCache for FileCache {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), "cache hit");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "cache miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);

        // Write then rename so a concurrent completion never reads a torn file.
        let staging = path.with_extension("tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;

        tracing::debug!(path = %path.display(), len = bytes.len(), "cache stored");
        Ok(())
    }
}

/// Remember `system` as the one trees were last evaluated for.
pub fn store_system(cache: &dyn ByteCache, system: &str) -> Result<()> {
    cache.put_bytes(SYSTEM_KEY, system.as_bytes())
}

/// The system recorded by [`store_system`], if any.
pub fn cached_system(cache: &dyn ByteCache) -> Result<Option<String>> {
    Ok(cache
        .get_bytes(SYSTEM_KEY)?
        .map(|b| String::from_utf8_lossy(&b).trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));

        assert_eq!(cache.get_bytes("abc").unwrap(), None);

        cache.put_bytes("abc", b"[]").unwrap();
        assert_eq!(cache.get_bytes("abc").unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_put_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        cache.put_bytes("k", b"old").unwrap();
        cache.put_bytes("k", b"new").unwrap();
        assert_eq!(cache.get_bytes("k").unwrap(), Some(b"new".to_vec()));
        assert!(!dir.path().join("k.tmp").exists());
    }

    #[test]
    fn test_system_marker() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        assert_eq!(cached_system(&cache).unwrap(), None);
        store_system(&cache, "aarch64-darwin").unwrap();
        assert_eq!(cached_system(&cache).unwrap().as_deref(), Some("aarch64-darwin"));
    }
}
