use crate::books::domain::model::Book;
use crate::core::library::MediaType;

// Display shape handed to the rendering layer; the nested publisher entity
// is flattened to the one field the screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct BookBinding {
    pub id: String,
    pub title: String,
    pub author: String,
    pub available: bool,
    pub pages: u32,
    pub year: i32,
    pub rating: f32,
    pub media_type: MediaType,
    pub publisher_name: String,
    pub cover_url: String,
}

impl From<&Book> for BookBinding {
    fn from(other: &Book) -> Self {
        Self {
            id: other.id.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            available: other.available,
            pages: other.pages,
            year: other.year,
            rating: other.rating,
            media_type: other.media_type,
            publisher_name: other.publisher.name.to_string(),
            cover_url: other.cover_url.to_string(),
        }
    }
}
