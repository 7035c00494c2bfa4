use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use crate::core::library::{DataError, DataResult};
use crate::core::store::BlobStore;

const URL_PREFIX: &str = "memory://blobs";

// In-process blob store pairing with MemoryDocumentStore.
#[derive(Clone)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    reject_uploads: Arc<Mutex<bool>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            reject_uploads: Arc::new(Mutex::new(false)),
        }
    }

    /// URL the store hands out for a key.
    pub fn url(key: &str) -> String {
        format!("{}/{}", URL_PREFIX, key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock_objects().contains_key(key)
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.lock_objects().get(key).cloned()
    }

    // Makes the next uploads fail, for exercising the cover-upload error path.
    pub fn set_reject_uploads(&self, reject: bool) {
        match self.reject_uploads.lock() {
            Ok(mut guard) => *guard = reject,
            Err(poisoned) => *poisoned.into_inner() = reject,
        }
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        match self.objects.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn rejecting(&self) -> bool {
        match self.reject_uploads.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        MemoryBlobStore::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> DataResult<String> {
        if self.rejecting() {
            return Err(DataError::upload_failed(
                format!("blob store rejected {}", key).as_str(), None, true));
        }
        self.lock_objects().insert(key.to_string(), bytes);
        Ok(MemoryBlobStore::url(key))
    }

    async fn delete(&self, key: &str) -> DataResult<()> {
        self.lock_objects().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::store::BlobStore;
    use crate::store::memory_blob_store::MemoryBlobStore;

    #[tokio::test]
    async fn test_should_upload_and_resolve_blob() {
        let store = MemoryBlobStore::new();
        let url = store.upload("books/1", vec![1, 2, 3]).await.expect("should upload blob");
        assert_eq!(MemoryBlobStore::url("books/1"), url);
        assert_eq!(Some(vec![1, 2, 3]), store.object("books/1"));
    }

    #[tokio::test]
    async fn test_should_delete_blob() {
        let store = MemoryBlobStore::new();
        let _ = store.upload("books/1", vec![1]).await.expect("should upload blob");
        store.delete("books/1").await.expect("should delete blob");
        assert!(!store.contains("books/1"));
        store.delete("books/1").await.expect("should tolerate repeated delete");
    }

    #[tokio::test]
    async fn test_should_reject_uploads_on_demand() {
        let store = MemoryBlobStore::new();
        store.set_reject_uploads(true);
        assert!(store.upload("books/1", vec![1]).await.is_err());
        store.set_reject_uploads(false);
        assert!(store.upload("books/1", vec![1]).await.is_ok());
    }
}
