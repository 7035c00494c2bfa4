use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::books::repository::BooksRepository;
use crate::core::command::{Command, CommandError};
use crate::core::stream::Feed;

pub struct ViewBookDetailsCommand {
    repository: Arc<dyn BooksRepository>,
}

impl ViewBookDetailsCommand {
    pub fn new(repository: Arc<dyn BooksRepository>) -> Self {
        Self {
            repository,
        }
    }
}

#[derive(Debug)]
pub struct ViewBookDetailsCommandRequest {
    pub book_id: String,
}

impl ViewBookDetailsCommandRequest {
    pub fn new(book_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ViewBookDetailsCommandResponse {
    pub feed: Feed<Option<Book>>,
}

impl ViewBookDetailsCommandResponse {
    pub fn new(feed: Feed<Option<Book>>) -> Self {
        Self {
            feed,
        }
    }
}

#[async_trait]
impl Command<ViewBookDetailsCommandRequest, ViewBookDetailsCommandResponse> for ViewBookDetailsCommand {
    async fn execute(&self, req: ViewBookDetailsCommandRequest) -> Result<ViewBookDetailsCommandResponse, CommandError> {
        Ok(ViewBookDetailsCommandResponse::new(self.repository.load_book(req.book_id.as_str())))
    }
}
