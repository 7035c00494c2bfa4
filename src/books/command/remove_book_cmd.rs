use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::books::repository::BooksRepository;
use crate::core::command::{Command, CommandError};

pub struct RemoveBookCommand {
    repository: Arc<dyn BooksRepository>,
}

impl RemoveBookCommand {
    pub fn new(repository: Arc<dyn BooksRepository>) -> Self {
        Self {
            repository,
        }
    }
}

#[derive(Debug)]
pub struct RemoveBookCommandRequest {
    pub book: Book,
}

impl RemoveBookCommandRequest {
    pub fn new(book: Book) -> Self {
        Self {
            book,
        }
    }
}

#[derive(Debug)]
pub struct RemoveBookCommandResponse {
}

impl RemoveBookCommandResponse {
    pub fn new() -> Self {
        Self {
        }
    }
}

impl Default for RemoveBookCommandResponse {
    fn default() -> Self {
        RemoveBookCommandResponse::new()
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        self.repository.remove(&req.book).await.map_err(CommandError::from)?;
        Ok(RemoveBookCommandResponse::new())
    }
}
