//! Upload operations (single-shot, multipart)

use std::path::Path;
use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio::sync::Semaphore;

use super::client::R2Client;
use super::types::StorageResult;

// Part size: 10MB per chunk
const PART_SIZE: u64 = 10 * 1024 * 1024;
// Concurrent uploads: 4 parts in parallel
const CONCURRENCY: usize = 4;

/// Destination key for a file landing in a folder.
pub(crate) fn object_key(folder_id: &str, name: &str) -> String {
    format!("{}{}", folder_id, name)
}

/// Upload a file in a single PUT.
pub async fn upload_simple(client: &R2Client, key: &str, source: &Path) -> StorageResult<String> {
    let body = ByteStream::from_path(source).await?;

    let response = client
        .s3
        .put_object()
        .bucket(&client.bucket)
        .key(key)
        .body(body)
        .send()
        .await?;

    Ok(response.e_tag().unwrap_or_default().to_string())
}

/// Initiate multipart upload
async fn initiate_multipart_upload(client: &R2Client, key: &str) -> StorageResult<String> {
    let response = client
        .s3
        .create_multipart_upload()
        .bucket(&client.bucket)
        .key(key)
        .send()
        .await?;

    let upload_id = response
        .upload_id()
        .ok_or("No upload ID returned")?
        .to_string();

    Ok(upload_id)
}

/// Upload a part in multipart upload
async fn upload_part(
    client: &R2Client,
    key: &str,
    upload_id: &str,
    part_number: i32,
    data: Vec<u8>,
) -> StorageResult<String> {
    let response = client
        .s3
        .upload_part()
        .bucket(&client.bucket)
        .key(key)
        .upload_id(upload_id)
        .part_number(part_number)
        .body(ByteStream::from(data))
        .send()
        .await?;

    Ok(response.e_tag().unwrap_or_default().to_string())
}

/// Complete multipart upload
async fn complete_multipart_upload(
    client: &R2Client,
    key: &str,
    upload_id: &str,
    parts: Vec<(i32, String)>, // (part_number, etag)
) -> StorageResult<()> {
    let completed_parts: Vec<CompletedPart> = parts
        .into_iter()
        .map(|(part_number, etag)| {
            CompletedPart::builder()
                .part_number(part_number)
                .e_tag(etag)
                .build()
        })
        .collect();

    let completed_upload = CompletedMultipartUpload::builder()
        .set_parts(Some(completed_parts))
        .build();

    client
        .s3
        .complete_multipart_upload()
        .bucket(&client.bucket)
        .key(key)
        .upload_id(upload_id)
        .multipart_upload(completed_upload)
        .send()
        .await?;

    Ok(())
}

/// Abort multipart upload
async fn abort_multipart_upload(
    client: &R2Client,
    key: &str,
    upload_id: &str,
) -> StorageResult<()> {
    client
        .s3
        .abort_multipart_upload()
        .bucket(&client.bucket)
        .key(key)
        .upload_id(upload_id)
        .send()
        .await?;

    Ok(())
}

/// Upload a large file through the vendor's multipart operations.
///
/// Parts are read by byte range and uploaded concurrently under a
/// semaphore; any part failure aborts the whole upload on the vendor side.
pub async fn upload_multipart(
    client: &R2Client,
    key: &str,
    source: &Path,
    size: u64,
) -> StorageResult<String> {
    if size == 0 {
        return Err("Cannot upload empty file".into());
    }

    let upload_id = initiate_multipart_upload(client, key).await?;
    let total_parts = ((size + PART_SIZE - 1) / PART_SIZE) as usize;

    let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
    let mut handles = Vec::new();

    for part_number in 1..=total_parts {
        let permit = semaphore.clone().acquire_owned().await?;
        let client = client.clone();
        let key = key.to_string();
        let upload_id = upload_id.clone();
        let source = source.to_path_buf();

        let handle = tokio::spawn(async move {
            let _permit = permit;

            // Byte range for this part
            let start = (part_number as u64 - 1) * PART_SIZE;
            let end = std::cmp::min(start + PART_SIZE, size);
            let part_data_size = end - start;

            let mut file = File::open(&source).await?;
            file.seek(SeekFrom::Start(start)).await?;

            let mut buffer = vec![0u8; part_data_size as usize];
            file.read_exact(&mut buffer).await?;

            let etag = upload_part(&client, &key, &upload_id, part_number as i32, buffer).await?;

            Ok::<(i32, String), Box<dyn std::error::Error + Send + Sync>>((
                part_number as i32,
                etag,
            ))
        });

        handles.push(handle);
    }

    let mut parts = Vec::new();
    let mut first_error: Option<Box<dyn std::error::Error + Send + Sync>> = None;

    for handle in handles {
        match handle.await {
            Ok(Ok((part_number, etag))) => {
                parts.push((part_number, etag));
            }
            Ok(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(format!("Task failed: {}", e).into());
                }
            }
        }
    }

    if let Some(err) = first_error {
        let _ = abort_multipart_upload(client, key, &upload_id).await;
        return Err(err);
    }

    // Parts must be in order when completing
    parts.sort_by_key(|(n, _)| *n);

    complete_multipart_upload(client, key, &upload_id, parts).await?;

    Ok(upload_id)
}

#[cfg(test)]
mod tests {
    use super::object_key;

    #[test]
    fn object_key_joins_folder_prefix_and_name() {
        assert_eq!(object_key("", "a.txt"), "a.txt");
        assert_eq!(object_key("photos/", "a.txt"), "photos/a.txt");
        assert_eq!(object_key("photos/2024/", "b.bin"), "photos/2024/b.bin");
    }
}
