use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::storage::{FolderKey, ObjectStore, UploadFile, join_url, object_key};

/// In-process object store, handy for tests and dry runs.
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: String,
    objects: Mutex<BTreeMap<String, Arc<[u8]>>>,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("memory://qr-files")
    }
}

impl MemoryObjectStore {
    /// Empty store resolving keys under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(BTreeMap::new()),
            fail: AtomicBool::new(false),
            delay: None,
        }
    }

    /// Sleep this long inside every `store` call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make subsequent `store` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().map(|m| m.len()).unwrap_or_default()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Bytes stored for the object a URL points at.
    pub fn get_by_url(&self, url: &str) -> Option<Arc<[u8]>> {
        let key = url
            .strip_prefix(self.base_url.trim_end_matches('/'))?
            .trim_start_matches('/');
        self.objects.lock().ok()?.get(key).cloned()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn store(&self, file: &UploadFile, folder: FolderKey) -> QrCraftResult<String> {
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(QrCraftError::upload("memory store is set to fail"));
        }
        file.validate()?;

        let key = object_key(folder, &file.extension());
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| QrCraftError::upload("memory store lock poisoned"))?;
        if objects.contains_key(&key) {
            return Err(QrCraftError::upload(format!("object key collision: {key}")));
        }
        objects.insert(key.clone(), file.bytes.clone());
        Ok(join_url(&self.base_url, &key))
    }
}
