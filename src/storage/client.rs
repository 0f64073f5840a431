//! The vendor client boundary

use std::path::Path;

use async_trait::async_trait;

use super::types::{ByteStream, Entry, FolderListing, StorageResult};
use super::{download, list, upload};

/// Operations the browser needs from the storage vendor. Production code
/// uses [`R2Client`]; tests substitute a recording mock.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// First page of entries directly under a folder.
    async fn list_folder(&self, folder_id: &str) -> StorageResult<FolderListing>;

    /// Single-shot upload of a local file into a folder.
    async fn upload_small(
        &self,
        source: &Path,
        name: &str,
        folder_id: &str,
    ) -> StorageResult<String>;

    /// Chunked upload of a large local file into a folder.
    async fn upload_chunked(
        &self,
        source: &Path,
        name: &str,
        size: u64,
        folder_id: &str,
    ) -> StorageResult<String>;

    /// Metadata for a single file.
    async fn file_info(&self, file_id: &str) -> StorageResult<Entry>;

    /// Open a byte stream over a file's content.
    async fn download(&self, file_id: &str) -> StorageResult<ByteStream>;
}

/// S3-compatible client bound to a single bucket.
#[derive(Debug, Clone)]
pub struct R2Client {
    pub(crate) s3: aws_sdk_s3::Client,
    pub(crate) http: reqwest::Client,
    pub(crate) bucket: String,
}

#[async_trait]
impl StorageClient for R2Client {
    async fn list_folder(&self, folder_id: &str) -> StorageResult<FolderListing> {
        list::list_folder(self, folder_id).await
    }

    async fn upload_small(
        &self,
        source: &Path,
        name: &str,
        folder_id: &str,
    ) -> StorageResult<String> {
        let key = upload::object_key(folder_id, name);
        upload::upload_simple(self, &key, source).await
    }

    async fn upload_chunked(
        &self,
        source: &Path,
        name: &str,
        size: u64,
        folder_id: &str,
    ) -> StorageResult<String> {
        let key = upload::object_key(folder_id, name);
        upload::upload_multipart(self, &key, source, size).await
    }

    async fn file_info(&self, file_id: &str) -> StorageResult<Entry> {
        download::file_info(self, file_id).await
    }

    async fn download(&self, file_id: &str) -> StorageResult<ByteStream> {
        download::download_stream(self, file_id).await
    }
}
