//! Object storage for extracted images.
//!
//! Images found on a page are uploaded once, under a deterministic key, and
//! referenced from the page tree by that key. URLs are resolved at render
//! time through [`ObjectStore::url`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};

/// A key/value blob store.
pub trait ObjectStore: Send + Sync {
    /// Persist `data` under `key`.
    fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Resolve a stored key to a URL. The URL may be time-limited.
    fn url(&self, key: &str) -> Result<String>;
}

/// Storage key for the `index`-th block of page `page`.
pub fn image_key(document_token: &str, page: usize, index: usize, ext: &str) -> String {
    format!("{}/image_{}_{}.{}", document_token, page, index, ext)
}

/// An object stored in a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-process store, mainly for tests and previews.
#[derive(Debug)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    base_url: String,
}

impl MemoryStore {
    /// Create a store that resolves keys to `memory://<key>`.
    pub fn new() -> Self {
        Self::with_base_url("memory://")
    }

    /// Create a store that resolves keys under `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            base_url: base_url.into(),
        }
    }

    /// Fetch a stored object.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .ok()
            .and_then(|objects| objects.get(key).cloned())
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn url(&self, key: &str) -> Result<String> {
        let objects = self
            .objects
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))?;
        if !objects.contains_key(key) {
            return Err(Error::Storage(format!("no object stored under '{}'", key)));
        }
        Ok(format!("{}{}", self.base_url, key))
    }
}

/// Stores objects as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    public_base: Option<String>,
}

impl DirectoryStore {
    /// Create a store rooted at `root`. The directory is created on first put.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base: None,
        }
    }

    /// Resolve keys under `base` (e.g. `images/` or `https://cdn/x/`) instead
    /// of `file://` URLs.
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = Some(base.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(Error::Storage(format!("invalid storage key '{}'", key)));
        }
        Ok(self.root.join(key))
    }
}

impl ObjectStore for DirectoryStore {
    fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("{}: {}", parent.display(), e)))?;
        }
        fs::write(&path, data).map_err(|e| Error::Storage(format!("{}: {}", path.display(), e)))?;
        log::debug!("Stored {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    fn url(&self, key: &str) -> Result<String> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(Error::Storage(format!("no object stored under '{}'", key)));
        }
        match self.public_base {
            Some(ref base) => Ok(format!("{}{}", base, key)),
            None => {
                let absolute = fs::canonicalize(&path)?;
                Ok(format!("file://{}", absolute.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_key() {
        assert_eq!(
            image_key("report.pdf-1234", 3, 1, "png"),
            "report.pdf-1234/image_3_1.png"
        );
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.url("missing").is_err());

        store.put("doc/a.png", b"abc", "image/png").unwrap();
        assert_eq!(store.url("doc/a.png").unwrap(), "memory://doc/a.png");
        assert_eq!(store.get("doc/a.png").unwrap().data, b"abc");
        assert_eq!(store.keys(), vec!["doc/a.png".to_string()]);
    }

    #[test]
    fn test_directory_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path()).with_public_base("images/");

        store.put("doc/image_0_0.png", b"png", "image/png").unwrap();
        assert_eq!(
            fs::read(dir.path().join("doc/image_0_0.png")).unwrap(),
            b"png"
        );
        assert_eq!(
            store.url("doc/image_0_0.png").unwrap(),
            "images/doc/image_0_0.png"
        );
    }

    #[test]
    fn test_directory_store_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.put("x/y.jpg", b"jpg", "image/jpeg").unwrap();
        let url = store.url("x/y.jpg").unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("x/y.jpg"));
    }

    #[test]
    fn test_directory_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        assert!(matches!(
            store.put("../escape.png", b"x", "image/png"),
            Err(Error::Storage(_))
        ));
        assert!(store.put("", b"x", "image/png").is_err());
    }
}
