use std::io::Cursor;
use std::path::{Path, PathBuf};
use image::codecs::jpeg::JpegEncoder;
use crate::core::library::{DataError, DataResult};

// URI scheme marking a cover image that still lives on the local filesystem.
pub const FILE_URI_SCHEME: &str = "file://";

/// Resolves a `file://` reference to a local path; None for any other URI.
pub fn local_path(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix(FILE_URI_SCHEME).map(PathBuf::from)
}

/// Re-encodes the image at `path` as JPEG at the given quality, bounding the
/// upload size regardless of the source format. Blocking; call it off the
/// async runtime.
pub fn compress_photo(path: &Path, quality: u8) -> DataResult<Vec<u8>> {
    let img = image::open(path).map_err(|err| {
        DataError::runtime(format!("failed to decode photo {:?} due to {}", path, err).as_str(), None)
    })?;
    let mut bytes = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut Cursor::new(&mut bytes), quality))
        .map_err(|err| {
            DataError::runtime(format!("failed to encode photo {:?} due to {}", path, err).as_str(), None)
        })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use image::{Rgb, RgbImage};
    use uuid::Uuid;
    use crate::utils::media::{compress_photo, local_path, FILE_URI_SCHEME};

    fn temp_photo() -> PathBuf {
        let path = std::env::temp_dir().join(format!("cover_{}.png", Uuid::new_v4()));
        RgbImage::from_pixel(64, 64, Rgb([40, 90, 200]))
            .save(&path).expect("should write test photo");
        path
    }

    #[tokio::test]
    async fn test_should_resolve_local_path() {
        assert_eq!(Some(PathBuf::from("/tmp/cover.jpg")), local_path("file:///tmp/cover.jpg"));
        assert_eq!(None, local_path("https://example.com/cover.jpg"));
        assert!(format!("{}{}", FILE_URI_SCHEME, "/tmp/a").starts_with("file://"));
    }

    #[tokio::test]
    async fn test_should_compress_photo_to_jpeg() {
        let path = temp_photo();
        let bytes = compress_photo(&path, 70).expect("should compress photo");
        assert!(!bytes.is_empty());
        let decoded = image::load_from_memory(&bytes).expect("should decode jpeg output");
        assert_eq!(64, decoded.width());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_should_fail_on_missing_photo() {
        let missing = std::env::temp_dir().join("missing_cover.png");
        assert!(compress_photo(&missing, 70).is_err());
    }
}
