//! JSON document store.
//!
//! Each logical collection (the cart, the product catalog) lives in one JSON
//! file. [`DocumentStore`] is the only code that touches those files.
//!
//! # Loading
//!
//! | File state                     | Result                    |
//! |--------------------------------|---------------------------|
//! | absent                         | caller's default          |
//! | empty, whitespace or BOM only  | caller's default          |
//! | non-blank, fails to parse      | [`StoreError::Corrupt`]   |
//! | any other read failure         | [`StoreError::Io`]        |
//!
//! # Saving
//!
//! Documents are written as pretty-printed JSON to a temporary file in the
//! target directory, synced, then renamed over the target. Readers see either
//! the old or the new document, never a partial one.
//!
//! # Concurrency
//!
//! [`DocumentStore::update`] holds a per-path async mutex for the whole
//! load, mutate and save cycle, so concurrent writers to the same document
//! are serialized and no update is lost. Plain [`DocumentStore::load`] takes
//! no lock. Locks are keyed by the path as given, so callers should always
//! use the same spelling for a document.

mod error;

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub use error::StoreError;

/// Loader and saver for JSON documents, with per-document write locks.
#[derive(Debug, Default)]
pub struct DocumentStore {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl DocumentStore {
    /// Create a store with no held locks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the document at `path`, or `default` if the file is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the file has content that does not
    /// parse as `T`, or [`StoreError::Io`] if it cannot be read.
    pub async fn load<T>(&self, path: &Path, default: T) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Document not found, using default");
                return Ok(default);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        if is_blank(&bytes) {
            tracing::warn!(path = %path.display(), "Document is empty, using default");
            return Ok(default);
        }

        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(path, e))
    }

    /// Atomically replace the document at `path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the document cannot be encoded or written.
    pub async fn save<T>(&self, path: &Path, document: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        Self::write(path, document, None).await
    }

    /// Load, mutate and save the document at `path` as one critical section.
    ///
    /// If `mutate` returns an error the document is not written and the error
    /// is returned unchanged. The lock is released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the error from `mutate`, or a [`StoreError`] (converted into
    /// `E`) if loading or saving fails.
    pub async fn update<T, R, E, F>(&self, path: &Path, default: T, mutate: F) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<StoreError>,
    {
        let guard = self.lock_for(path).await.lock_owned().await;

        let mut document = self.load(path, default).await?;
        let outcome = mutate(&mut document)?;
        Self::write(path, &document, Some(guard)).await?;

        Ok(outcome)
    }

    /// Encode `document` and hand it to a blocking write.
    ///
    /// The blocking task owns `guard`, so the lock stays held until the file
    /// is renamed into place even if this future is dropped first.
    async fn write<T>(
        path: &Path,
        document: &T,
        guard: Option<OwnedMutexGuard<()>>,
    ) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::io(path, io::Error::other(e)))?;

        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            write_atomic(&target, &bytes)
        })
        .await
        .map_err(|e| StoreError::io(path, io::Error::other(e)))?
    }

    async fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }
}

/// Whitespace-only content, where a leading byte order mark also counts.
fn is_blank(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes)
        .is_ok_and(|text| {
            text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
                .is_empty()
        })
}

/// Write `bytes` to a sibling temp file and rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| StoreError::io(path, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(path, e))?;
    temp.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(path, e))?;
    temp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        name: String,
        count: u32,
    }

    fn entry(name: &str, count: u32) -> Entry {
        Entry {
            name: name.to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn test_load_absent_returns_default() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new();

        let loaded = store
            .load(&dir.path().join("missing.json"), vec![entry("d", 1)])
            .await
            .unwrap();
        assert_eq!(loaded, vec![entry("d", 1)]);
    }

    #[tokio::test]
    async fn test_load_blank_returns_default() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new();

        for (name, content) in [
            ("empty.json", ""),
            ("spaces.json", "  \n\t \r\n"),
            ("nbsp.json", "\u{a0}\n\u{3000}"),
            ("bom.json", "\u{feff}\n"),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            let loaded: Vec<Entry> = store.load(&path, Vec::new()).await.unwrap();
            assert!(loaded.is_empty(), "{name} should load as default");
        }
    }

    #[tokio::test]
    async fn test_load_corrupt_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let err = DocumentStore::new()
            .load::<Vec<Entry>>(&path, Vec::new())
            .await
            .unwrap_err();
        assert!(err.is_corrupt());
        assert_eq!(err.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shape.json");
        std::fs::write(&path, r#"{"name": "x", "count": 1}"#).unwrap();

        let err = DocumentStore::new()
            .load::<Vec<Entry>>(&path, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();

        let err = DocumentStore::new()
            .load::<Vec<Entry>>(dir.path(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_save_is_pretty_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let store = DocumentStore::new();

        store.save(&path, &vec![entry("a", 1)]).await.unwrap();
        store.save(&path, &vec![entry("b", 2)]).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            "[\n  {\n    \"name\": \"b\",\n    \"count\": 2\n  }\n]"
        );

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(leftovers.len(), 1, "temp files must not be left behind");
    }

    #[tokio::test]
    async fn test_update_error_skips_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let store = DocumentStore::new();

        let result: Result<(), StoreError> = store
            .update(&path, Vec::<Entry>::new(), |_| {
                Err(StoreError::io(Path::new("x"), io::Error::other("rejected")))
            })
            .await;

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counter.json");
        let store = Arc::new(DocumentStore::new());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            let path = path.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(&path, 0_u64, |n| {
                        *n += 1;
                        Ok::<_, StoreError>(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let total: u64 = store.load(&path, 0).await.unwrap();
        assert_eq!(total, 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_aborted_update_keeps_lock_until_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        let store = Arc::new(DocumentStore::new());

        for _ in 0..5 {
            store.save(&path, &Vec::<String>::new()).await.unwrap();

            let slow = {
                let store = Arc::clone(&store);
                let path = path.clone();
                tokio::spawn(async move {
                    store
                        .update(&path, Vec::<String>::new(), |doc| {
                            doc.push("a".repeat(16 * 1024 * 1024));
                            Ok::<_, StoreError>(())
                        })
                        .await
                })
            };
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
            slow.abort();
            let _ = slow.await;

            store
                .update(&path, Vec::<String>::new(), |doc| {
                    doc.push("b".to_string());
                    Ok::<_, StoreError>(())
                })
                .await
                .unwrap();

            let doc: Vec<String> = store.load(&path, Vec::new()).await.unwrap();
            assert_eq!(doc.last().map(String::as_str), Some("b"));
        }
    }
}
