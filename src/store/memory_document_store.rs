use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;
use crate::core::library::{DataError, DataResult};
use crate::core::store::{Document, DocumentFilter, DocumentStore, ID_FIELD};
use crate::core::stream;
use crate::core::stream::Feed;

// In-process document store with push notifications on every mutation.
// Reference backend for local runs and the test double for the cloud one;
// the offline toggle simulates a transport outage, failing writes and
// terminating live feeds the way a broken listener would.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<String, Document>>,
    document_watchers: Vec<DocumentWatcher>,
    collection_watchers: Vec<CollectionWatcher>,
    offline: bool,
}

struct DocumentWatcher {
    collection: String,
    id: String,
    tx: stream::Sender<DataResult<Option<Document>>>,
}

struct CollectionWatcher {
    collection: String,
    filter: DocumentFilter,
    tx: stream::Sender<DataResult<Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    // Simulates losing (or regaining) the backend: while offline every write
    // fails and all live feeds end with an error.
    pub fn set_offline(&self, offline: bool) {
        let mut inner = self.lock();
        inner.offline = offline;
        if offline {
            inner.fail_watchers();
        }
    }

    /// Raw stored document, for asserting persisted state.
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.lock().collections.get(collection).and_then(|docs| docs.get(id)).cloned()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.lock().collections.get(collection).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        MemoryDocumentStore::new()
    }
}

impl Inner {
    fn publish(&mut self, collection: &str) {
        let snapshot = self.collections.get(collection).cloned().unwrap_or_default();
        self.document_watchers.retain(|w| {
            if w.collection != collection {
                return !w.tx.is_closed();
            }
            w.tx.send(Ok(snapshot.get(&w.id).cloned()))
        });
        self.collection_watchers.retain(|w| {
            if w.collection != collection {
                return !w.tx.is_closed();
            }
            w.tx.send(Ok(matching(&snapshot, &w.filter)))
        });
    }

    fn fail_watchers(&mut self) {
        for watcher in self.document_watchers.drain(..) {
            let _ = watcher.tx.send(Err(listener_lost()));
        }
        for watcher in self.collection_watchers.drain(..) {
            let _ = watcher.tx.send(Err(listener_lost()));
        }
    }
}

fn listener_lost() -> DataError {
    DataError::unavailable("document store listener lost", None, true)
}

fn offline() -> DataError {
    DataError::unavailable("document store offline", None, true)
}

fn matching(docs: &BTreeMap<String, Document>, filter: &DocumentFilter) -> Vec<Document> {
    docs.values()
        .filter(|doc| filter.iter().all(|(field, expected)| {
            doc.get(field).and_then(Value::as_str) == Some(expected.as_str())
        }))
        .cloned()
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create_or_merge(&self, collection: &str, id: Option<&str>,
                             fields: Document) -> DataResult<String> {
        let mut inner = self.lock();
        if inner.offline {
            return Err(offline());
        }
        let id = id.map(str::to_string).unwrap_or_else(|| Uuid::new_v4().to_string());
        let doc = inner.collections
            .entry(collection.to_string())
            .or_default()
            .entry(id.clone())
            .or_default();
        for (field, value) in fields {
            doc.insert(field, value);
        }
        // reads must always carry the storage key
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        inner.publish(collection);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> DataResult<()> {
        let mut inner = self.lock();
        if inner.offline {
            return Err(offline());
        }
        let removed = inner.collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            inner.publish(collection);
        }
        Ok(())
    }

    fn subscribe_collection(&self, collection: &str, filter: &DocumentFilter) -> Feed<Vec<Document>> {
        let (tx, rx) = stream::channel();
        let mut inner = self.lock();
        if inner.offline {
            let _ = tx.send(Err(offline()));
            return Feed::new(rx, None);
        }
        let snapshot = inner.collections.get(collection).cloned().unwrap_or_default();
        let _ = tx.send(Ok(matching(&snapshot, filter)));
        inner.collection_watchers.push(CollectionWatcher {
            collection: collection.to_string(),
            filter: filter.clone(),
            tx,
        });
        Feed::new(rx, None)
    }

    fn subscribe_document(&self, collection: &str, id: &str) -> Feed<Option<Document>> {
        let (tx, rx) = stream::channel();
        let mut inner = self.lock();
        if inner.offline {
            let _ = tx.send(Err(offline()));
            return Feed::new(rx, None);
        }
        let current = inner.collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned();
        let _ = tx.send(Ok(current));
        inner.document_watchers.push(DocumentWatcher {
            collection: collection.to_string(),
            id: id.to_string(),
            tx,
        });
        Feed::new(rx, None)
    }
}
