//! A whole-file JSON document with a short read cache.

use crate::cache::TtlCell;
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One JSON file holding a whole collection.
///
/// Reads are served from memory for up to the TTL. Writes go through
/// [`JsonCollection::update`], which re-reads the file, applies the change
/// and rewrites the file in full. Writers in the same process are
/// serialized; another process writing the same file still wins or loses
/// by timing.
pub struct JsonCollection<T> {
    path: PathBuf,
    cache: Mutex<TtlCell<T>>,
    write_lock: Mutex<()>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(TtlCell::new(ttl)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current document. A missing file reads as the default.
    pub fn read(&self) -> Result<T, StoreError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(doc) = cache.get() {
            return Ok(doc);
        }
        let doc = self.load()?;
        cache.insert(doc.clone());
        Ok(doc)
    }

    /// Applies `change` to a fresh copy of the document and persists it.
    ///
    /// Nothing is written when `change` fails.
    pub fn update<R>(
        &self,
        change: impl FnOnce(&mut T) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.load()?;
        let out = change(&mut doc)?;
        self.persist(&doc)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(doc);
        Ok(out)
    }

    fn load(&self) -> Result<T, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(T::default()),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&self.path, e))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn persist(&self, doc: &T) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        let json = serde_json::to_vec_pretty(doc).map_err(|e| StoreError::json(&self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "collection written");
        Ok(())
    }
}
