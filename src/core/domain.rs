use serde::{Deserialize, Serialize};

// Configuration abstracts fixed options for the book catalog data layer
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub books_collection: String,
    pub covers_prefix: String,
    pub cover_jpeg_quality: u8,
    pub watch_poll_millis: u64,
}

impl Configuration {
    pub fn new() -> Self {
        Configuration {
            books_collection: "books".to_string(),
            covers_prefix: "books".to_string(),
            cover_jpeg_quality: 70,
            watch_poll_millis: 500,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
