use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::books::repository::BooksRepository;
use crate::core::command::{Command, CommandError};
use crate::core::stream::Feed;

pub struct ListBooksCommand {
    repository: Arc<dyn BooksRepository>,
}

impl ListBooksCommand {
    pub fn new(repository: Arc<dyn BooksRepository>) -> Self {
        Self {
            repository,
        }
    }
}

#[derive(Debug)]
pub struct ListBooksCommandRequest {
}

impl ListBooksCommandRequest {
    pub fn new() -> Self {
        Self {
        }
    }
}

impl Default for ListBooksCommandRequest {
    fn default() -> Self {
        ListBooksCommandRequest::new()
    }
}

#[derive(Debug)]
pub struct ListBooksCommandResponse {
    pub feed: Feed<Vec<Book>>,
}

impl ListBooksCommandResponse {
    pub fn new(feed: Feed<Vec<Book>>) -> Self {
        Self {
            feed,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, _req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        Ok(ListBooksCommandResponse::new(self.repository.load_books()))
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use std::sync::Arc;
    use crate::books::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
    use crate::books::domain::model::Book;
    use crate::books::factory::create_books_repository;
    use crate::books::repository::BooksRepository;
    use crate::core::command::Command;
    use crate::core::store::StoreBackend;
    use crate::store::session::Session;

    lazy_static! {
        static ref SUT_REPO: AsyncOnce<Arc<dyn BooksRepository>> = AsyncOnce::new(async {
                let session = Session::new();
                session.sign_in("user-list");
                create_books_repository(StoreBackend::Memory, Arc::new(session)).await
            });
    }

    #[tokio::test]
    async fn test_should_run_list_books() {
        let repository = SUT_REPO.get().await.clone();
        let mut book = Book::new("Clean Code", "Uncle Bob");
        repository.save(&mut book).await.expect("should save book");

        let cmd = ListBooksCommand::new(repository);
        let mut res = cmd.execute(ListBooksCommandRequest::new())
            .await.expect("should subscribe");
        let listed = res.feed.recv().await.expect("should emit").expect("should not error");
        assert!(listed.iter().any(|b| b.id == book.id));
    }
}
