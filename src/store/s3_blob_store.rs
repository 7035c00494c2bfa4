use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;
use crate::core::library::{DataError, DataResult};
use crate::core::store::BlobStore;
use crate::utils::ddb::retryable_sdk_error;

// S3-backed blob store. Objects land under the configured bucket and are
// resolved through the bucket's public object URLs.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: &str, region: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> DataResult<String> {
        self.client
            .put_object()
            .bucket(self.bucket.as_str())
            .key(key)
            .content_type("image/jpeg")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| {
                let (retryable, reason) = retryable_sdk_error(&err);
                DataError::upload_failed(format!("{:?}", err).as_str(), reason, retryable)
            })?;
        debug!("uploaded blob {} to {}", key, self.bucket);
        Ok(self.object_url(key))
    }

    async fn delete(&self, key: &str) -> DataResult<()> {
        self.client
            .delete_object()
            .bucket(self.bucket.as_str())
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| {
                let (retryable, reason) = retryable_sdk_error(&err);
                DataError::unavailable(format!("{:?}", err).as_str(), reason, retryable)
            })
    }
}
