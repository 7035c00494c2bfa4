use std::sync::Arc;
use crate::core::domain::Configuration;
use crate::core::store::{BlobBackend, BlobStore, DocumentStore, StoreBackend, ID_FIELD, USER_ID_FIELD};
use crate::store::ddb_document_store::DdbDocumentStore;
use crate::store::memory_blob_store::MemoryBlobStore;
use crate::store::memory_document_store::MemoryDocumentStore;
use crate::store::s3_blob_store::S3BlobStore;
use crate::utils::ddb::{build_db_client, create_table};

const COVERS_BUCKET: &str = "bookshelf-covers";

pub async fn create_document_store(backend: StoreBackend,
                                   config: &Configuration) -> Arc<dyn DocumentStore> {
    match backend {
        StoreBackend::Memory => {
            Arc::new(MemoryDocumentStore::new())
        }
        StoreBackend::DynamoDb => {
            let client = build_db_client(backend).await;
            Arc::new(DdbDocumentStore::new(client, config.watch_poll_millis))
        }
        StoreBackend::LocalDynamoDb => {
            let client = build_db_client(backend).await;
            let _ = create_table(&client, config.books_collection.as_str(),
                                 ID_FIELD, USER_ID_FIELD).await;
            Arc::new(DdbDocumentStore::new(client, config.watch_poll_millis))
        }
    }
}

pub async fn create_blob_store(backend: StoreBackend) -> Arc<dyn BlobStore> {
    match backend.blob_backend() {
        BlobBackend::Memory => {
            Arc::new(MemoryBlobStore::new())
        }
        BlobBackend::S3 => {
            let config = aws_config::load_from_env().await;
            let region = config.region().map(|r| r.to_string())
                .unwrap_or_else(|| "us-east-1".to_string());
            let client = aws_sdk_s3::Client::new(&config);
            Arc::new(S3BlobStore::new(client, COVERS_BUCKET, region.as_str()))
        }
    }
}
