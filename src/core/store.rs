use async_trait::async_trait;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::library::DataResult;
use crate::core::stream::Feed;

// Field name carrying the storage key inside every stored document.
pub const ID_FIELD: &str = "id";
// Field name carrying the owner identity, set from the session at save time.
pub const USER_ID_FIELD: &str = "user_id";
// Field name carrying the cover image location.
pub const COVER_URL_FIELD: &str = "cover_url";

/// Schema-free record stored in a named collection.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Equality predicate applied to collection subscriptions.
pub type DocumentFilter = HashMap<String, String>;

// Durable storage and live-query primitives, independent of domain shape.
#[async_trait]
pub trait DocumentStore: Sync + Send {
    // Creates the document (allocating an id if none is given) or merges the
    // given fields into the existing one, leaving absent fields untouched.
    // Returns the storage key.
    async fn create_or_merge(&self, collection: &str, id: Option<&str>,
                             fields: Document) -> DataResult<String>;

    // Removes the document; deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> DataResult<()>;

    // Live result set for an equality filter. Every emission is the full
    // current result set, conflated to the newest. The current snapshot is
    // emitted immediately; a backend error ends the feed abnormally.
    fn subscribe_collection(&self, collection: &str, filter: &DocumentFilter) -> Feed<Vec<Document>>;

    // Live value of a single document; None means the document does not exist.
    fn subscribe_document(&self, collection: &str, id: &str) -> Feed<Option<Document>>;
}

// Binary objects at string keys, resolvable through public URLs.
#[async_trait]
pub trait BlobStore: Sync + Send {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> DataResult<String>;

    async fn delete(&self, key: &str) -> DataResult<()>;
}

// Read-only view of the authenticated session. Handed to the repository as
// an explicit collaborator so it stays testable without a live backend.
pub trait IdentityProvider: Sync + Send {
    fn current_user_id(&self) -> Option<String>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum StoreBackend {
    Memory,
    DynamoDb,
    LocalDynamoDb,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BlobBackend {
    Memory,
    S3,
}

impl StoreBackend {
    pub fn blob_backend(&self) -> BlobBackend {
        match self {
            StoreBackend::Memory => { BlobBackend::Memory }
            StoreBackend::DynamoDb => { BlobBackend::S3 }
            // no local object store ships with the local database setup
            StoreBackend::LocalDynamoDb => { BlobBackend::Memory }
        }
    }
}
