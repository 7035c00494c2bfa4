use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::Book;
use crate::books::repository::BooksRepository;
use crate::core::command::{Command, CommandError};

pub struct SaveBookCommand {
    repository: Arc<dyn BooksRepository>,
}

impl SaveBookCommand {
    pub fn new(repository: Arc<dyn BooksRepository>) -> Self {
        Self {
            repository,
        }
    }
}

#[derive(Debug)]
pub struct SaveBookCommandRequest {
    pub book: Book,
}

impl SaveBookCommandRequest {
    pub fn new(book: Book) -> Self {
        Self {
            book,
        }
    }
}

#[derive(Debug)]
pub struct SaveBookCommandResponse {
    pub book: Book,
}

impl SaveBookCommandResponse {
    pub fn new(book: Book) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<SaveBookCommandRequest, SaveBookCommandResponse> for SaveBookCommand {
    async fn execute(&self, req: SaveBookCommandRequest) -> Result<SaveBookCommandResponse, CommandError> {
        let mut book = req.book;
        self.repository.save(&mut book).await.map_err(CommandError::from)?;
        Ok(SaveBookCommandResponse::new(book))
    }
}
