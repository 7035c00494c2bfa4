use std::sync::Arc;
use crate::books::repository::BooksRepository;
use crate::books::repository::store_books_repository::StoreBooksRepository;
use crate::core::domain::Configuration;
use crate::core::store::{IdentityProvider, StoreBackend};
use crate::store::factory::{create_blob_store, create_document_store};

pub async fn create_books_repository(backend: StoreBackend,
                                     identity: Arc<dyn IdentityProvider>) -> Arc<dyn BooksRepository> {
    let config = Configuration::new();
    let documents = create_document_store(backend, &config).await;
    let blobs = create_blob_store(backend).await;
    Arc::new(StoreBooksRepository::new(&config, documents, blobs, identity))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::domain::model::Book;
    use crate::books::factory::create_books_repository;
    use crate::core::store::StoreBackend;
    use crate::store::session::Session;

    #[tokio::test]
    async fn test_should_create_memory_repository() {
        let session = Session::new();
        session.sign_in("user-factory");
        let repository = create_books_repository(
            StoreBackend::Memory, Arc::new(session.clone())).await;
        let mut book = Book::new("Clean Code", "Uncle Bob");
        repository.save(&mut book).await.expect("should save book");
        assert!(book.is_persisted());
    }
}
