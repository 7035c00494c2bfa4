use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use crate::books::domain::model::Book;
use crate::books::repository::BooksRepository;
use crate::core::domain::Configuration;
use crate::core::library::{DataError, DataResult};
use crate::core::store::{BlobStore, Document, DocumentFilter, DocumentStore, IdentityProvider,
                         COVER_URL_FIELD, ID_FIELD, USER_ID_FIELD};
use crate::core::stream;
use crate::core::stream::Feed;
use crate::utils::media;

// Orchestrates the store primitives into the book lifecycle: create/merge
// writes, owner-scoped live queries, and the cover pipeline (compress,
// upload, patch, delete local) that runs strictly after the record write.
pub struct StoreBooksRepository {
    config: Configuration,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl StoreBooksRepository {
    pub fn new(config: &Configuration,
               documents: Arc<dyn DocumentStore>,
               blobs: Arc<dyn BlobStore>,
               identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: config.clone(),
            documents,
            blobs,
            identity,
        }
    }

    fn cover_key(&self, book_id: &str) -> String {
        format!("{}/{}", self.config.covers_prefix, book_id)
    }

    // Compress, upload, patch the record, then drop the local file. Ordered
    // after the record write because the blob key needs the allocated id, and
    // the local file may only go once the remote URL is durably recorded.
    async fn upload_cover(&self, book: &mut Book) -> DataResult<()> {
        let local = media::local_path(book.cover_url.as_str()).ok_or_else(|| {
            DataError::cover_upload(
                format!("cover {} is not a local file", book.cover_url).as_str(), None)
        })?;
        let quality = self.config.cover_jpeg_quality;
        let photo = local.clone();
        let bytes = tokio::task::spawn_blocking(move || media::compress_photo(photo.as_path(), quality))
            .await
            .map_err(|err| DataError::cover_upload(
                format!("cover compression stopped due to {}", err).as_str(), None))?
            .map_err(cover_failure)?;

        let url = self.blobs.upload(self.cover_key(book.id.as_str()).as_str(), bytes)
            .await.map_err(cover_failure)?;

        let mut patch = Document::new();
        patch.insert(COVER_URL_FIELD.to_string(), Value::String(url.clone()));
        self.documents.create_or_merge(self.config.books_collection.as_str(),
                                       Some(book.id.as_str()), patch)
            .await.map_err(cover_failure)?;

        if let Err(err) = tokio::fs::remove_file(&local).await {
            warn!("failed to remove local cover {:?}: {}", local, err);
        }
        book.cover_url = url;
        Ok(())
    }
}

#[async_trait]
impl BooksRepository for StoreBooksRepository {
    async fn save(&self, book: &mut Book) -> DataResult<()> {
        let user_id = self.identity.current_user_id()
            .ok_or_else(|| DataError::unauthorized("no signed-in user"))?;
        if !book.rating.is_finite() || !(0.0..=5.0).contains(&book.rating) {
            return Err(DataError::validation(
                format!("rating {} outside 0-5", book.rating).as_str(), None));
        }
        // ownership always comes from the session, never from the caller
        book.user_id = user_id;

        let collection = self.config.books_collection.as_str();
        if book.is_persisted() {
            let fields = document_from_book(book)?;
            self.documents.create_or_merge(collection, Some(book.id.as_str()), fields)
                .await.map_err(save_failure)?;
        } else {
            let fields = document_from_book(book)?;
            let id = self.documents.create_or_merge(collection, None, fields)
                .await.map_err(save_failure)?;
            book.id = id;
            let mut keys = Document::new();
            keys.insert(ID_FIELD.to_string(), Value::String(book.id.clone()));
            keys.insert(USER_ID_FIELD.to_string(), Value::String(book.user_id.clone()));
            self.documents.create_or_merge(collection, Some(book.id.as_str()), keys)
                .await.map_err(save_failure)?;
        }
        debug!("saved book {}", book.id);

        if book.has_pending_cover() {
            self.upload_cover(book).await?;
        }
        Ok(())
    }

    fn load_books(&self) -> Feed<Vec<Book>> {
        let user_id = match self.identity.current_user_id() {
            Some(user_id) => user_id,
            None => {
                // nobody signed in: nothing can match the owner filter
                let (tx, rx) = stream::channel();
                let _ = tx.send(Ok(Vec::new()));
                return Feed::new(rx, None);
            }
        };
        let filter = DocumentFilter::from([(USER_ID_FIELD.to_string(), user_id)]);
        self.documents
            .subscribe_collection(self.config.books_collection.as_str(), &filter)
            .translate(|documents| documents.into_iter().map(book_from_document).collect())
    }

    fn load_book(&self, book_id: &str) -> Feed<Option<Book>> {
        self.documents
            .subscribe_document(self.config.books_collection.as_str(), book_id)
            .translate(|document| document.map(book_from_document).transpose())
    }

    async fn remove(&self, book: &Book) -> DataResult<()> {
        self.documents.delete(self.config.books_collection.as_str(), book.id.as_str()).await?;
        if !book.cover_url.is_empty() {
            // a failed blob delete still surfaces, even though the record is
            // already gone
            self.blobs.delete(self.cover_key(book.id.as_str()).as_str()).await?;
        }
        debug!("removed book {}", book.id);
        Ok(())
    }
}

fn save_failure(err: DataError) -> DataError {
    DataError::save_failed(format!("failed to save book due to {}", err).as_str(), None)
}

fn cover_failure(err: DataError) -> DataError {
    DataError::cover_upload(format!("failed to upload book cover due to {}", err).as_str(), None)
}

fn document_from_book(book: &Book) -> DataResult<Document> {
    match serde_json::to_value(book)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DataError::serialization(
            format!("expected object for book, got {:?}", other).as_str())),
    }
}

fn book_from_document(document: Document) -> DataResult<Book> {
    let book: Book = serde_json::from_value(Value::Object(document))?;
    if book.id.is_empty() {
        return Err(DataError::runtime("stored book is missing its id", None));
    }
    Ok(book)
}
