pub mod ddb_document_store;
pub mod factory;
pub mod memory_blob_store;
pub mod memory_document_store;
pub mod s3_blob_store;
pub mod session;
