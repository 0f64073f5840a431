//! Object metadata and streamed downloads

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use futures_util::{StreamExt, TryStreamExt};

use super::client::R2Client;
use super::list::leaf_name;
use super::types::{ByteStream, Entry, EntryKind, StorageResult};

/// Presigned URL lifetime for downloads
const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

/// Fetch a file's metadata; the name doubles as the suggested save filename.
pub async fn file_info(client: &R2Client, file_id: &str) -> StorageResult<Entry> {
    let response = client
        .s3
        .head_object()
        .bucket(&client.bucket)
        .key(file_id)
        .send()
        .await?;

    Ok(Entry {
        id: file_id.to_string(),
        name: leaf_name(file_id),
        kind: EntryKind::File,
        size: response.content_length().unwrap_or(0),
        last_modified: response
            .last_modified()
            .map(|dt| dt.to_string())
            .unwrap_or_default(),
        url: None,
    })
}

/// Open a byte stream over a file's content via a fresh presigned URL.
pub async fn download_stream(client: &R2Client, file_id: &str) -> StorageResult<ByteStream> {
    let presigning_config = PresigningConfig::builder()
        .expires_in(Duration::from_secs(DOWNLOAD_URL_TTL_SECS))
        .build()?;

    let presigned_request = client
        .s3
        .get_object()
        .bucket(&client.bucket)
        .key(file_id)
        .presigned(presigning_config)
        .await?;

    let response = client
        .http
        .get(presigned_request.uri().to_string())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(format!("Download failed: {} - {}", status, text).into());
    }

    Ok(response
        .bytes_stream()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        .boxed())
}
