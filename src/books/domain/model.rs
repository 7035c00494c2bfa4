use serde::{Deserialize, Serialize};
use crate::core::library::MediaType;
use crate::utils::media::FILE_URI_SCHEME;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Publisher {
    pub id: String,
    pub name: String,
}

impl Publisher {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

// Book is the domain record the catalog stores. An empty id means the book
// only exists in memory; the store assigns the id at first save and it never
// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub available: bool,
    pub pages: u32,
    pub year: i32,
    pub rating: f32,
    pub media_type: MediaType,
    pub publisher: Publisher,
    pub cover_url: String,
    pub user_id: String,
}

impl Book {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            id: String::new(),
            title: title.to_string(),
            author: author.to_string(),
            available: true,
            pages: 0,
            year: 0,
            rating: 0.0,
            media_type: MediaType::Paper,
            publisher: Publisher::default(),
            cover_url: String::new(),
            user_id: String::new(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    // cover still sits on the local filesystem, waiting for upload
    pub fn has_pending_cover(&self) -> bool {
        self.cover_url.starts_with(FILE_URI_SCHEME)
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{Book, Publisher};
    use crate::core::library::MediaType;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = Book::new("Clean Code", "Uncle Bob");
        assert_eq!("Clean Code", book.title.as_str());
        assert_eq!("Uncle Bob", book.author.as_str());
        assert_eq!(MediaType::Paper, book.media_type);
        assert!(!book.is_persisted());
    }

    #[tokio::test]
    async fn test_should_detect_pending_cover() {
        let mut book = Book::new("Clean Code", "Uncle Bob");
        assert!(!book.has_pending_cover());
        book.cover_url = "file:///tmp/cover.jpg".to_string();
        assert!(book.has_pending_cover());
        book.cover_url = "https://covers.example.com/42".to_string();
        assert!(!book.has_pending_cover());
    }

    #[tokio::test]
    async fn test_should_build_publisher() {
        let publisher = Publisher::new("p1", "Novatec");
        assert_eq!("p1", publisher.id.as_str());
        assert_eq!("Novatec", publisher.name.as_str());
    }
}
