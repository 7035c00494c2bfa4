pub mod store_books_repository;

use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::core::library::DataResult;
use crate::core::stream::Feed;

// Domain-level book lifecycle over the store primitives. Feeds are live and
// conflated; cancelling (or dropping) one detaches its backend listener.
#[async_trait]
pub trait BooksRepository: Sync + Send {
    // Persists the book. A book without an id is created and gets the
    // allocated id written back; otherwise the write is a merge-upsert.
    // A cover referenced through a local file is uploaded afterwards.
    async fn save(&self, book: &mut Book) -> DataResult<()>;

    // Live list of the signed-in user's books; an empty list (never an
    // error) when there are none or no one is signed in.
    fn load_books(&self) -> Feed<Vec<Book>>;

    // Live single-book feed; None means not found or deleted.
    fn load_book(&self, book_id: &str) -> Feed<Option<Book>>;

    // Deletes the record and, when a cover was uploaded, its blob.
    async fn remove(&self, book: &Book) -> DataResult<()>;
}
