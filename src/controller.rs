//! Folder browser and transfer controller
//!
//! Owns the session client, the current listing, and the upload flag. All
//! remote work goes through the [`StorageClient`] boundary so the controller
//! itself never touches the network stack.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use log::{error, info};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::storage::{ByteStream, Entry, StorageClient};

/// Identifier of the account's root folder (the empty key prefix).
pub const ROOT_FOLDER: &str = "";

/// Files at or above this size take the chunked upload path (20 MiB).
pub const CHUNKED_UPLOAD_THRESHOLD: u64 = 20 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// No credential has been supplied yet. The UI shows this as a prompt
    /// to enter one; no remote call is made.
    #[error("Please enter an API credential first")]
    NoSession,
    /// A vendor call failed; the message carries the flattened error chain.
    #[error("{0}")]
    Vendor(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Flatten a vendor error chain into one line, log it, and wrap it.
fn vendor_error(e: Box<dyn std::error::Error + Send + Sync>) -> BrowserError {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    error!("storage call failed: {}", message);
    BrowserError::Vendor(message)
}

/// The folder browser and transfer controller.
///
/// Holds the one mutable session slot: [`Browser::set_session`] replaces the
/// client wholesale, with no teardown of the previous one.
pub struct Browser<C> {
    client: Option<C>,
    entries: Vec<Entry>,
    current_folder: String,
    uploading: Arc<AtomicBool>,
}

impl<C: StorageClient> Browser<C> {
    pub fn new() -> Self {
        Browser {
            client: None,
            entries: Vec::new(),
            current_folder: ROOT_FOLDER.to_string(),
            uploading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the session wholesale.
    pub fn set_session(&mut self, client: C) {
        self.client = Some(client);
    }

    pub fn has_session(&self) -> bool {
        self.client.is_some()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn current_folder(&self) -> &str {
        &self.current_folder
    }

    /// Shared handle to the upload-in-progress flag.
    pub fn upload_flag(&self) -> Arc<AtomicBool> {
        self.uploading.clone()
    }

    fn session(&self) -> Result<&C, BrowserError> {
        self.client.as_ref().ok_or(BrowserError::NoSession)
    }

    /// Fetch the first page of a folder and make it the current listing.
    ///
    /// On failure neither the listing nor the current folder changes.
    pub async fn open_folder(&mut self, folder_id: &str) -> Result<Vec<Entry>, BrowserError> {
        let client = self.session()?;
        let listing = client.list_folder(folder_id).await.map_err(vendor_error)?;

        self.entries = listing.entries;
        self.current_folder = folder_id.to_string();

        Ok(self.entries.clone())
    }

    /// Upload a local file into the current folder, then refresh the
    /// listing for that folder exactly once.
    ///
    /// The uploading flag spans the vendor call and is cleared on every
    /// exit path of it.
    pub async fn upload(&mut self, source: &Path) -> Result<Vec<Entry>, BrowserError> {
        let client = self.session()?;

        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "source has no file name")
            })?
            .to_string();
        let size = tokio::fs::metadata(source).await?.len();
        let folder = self.current_folder.clone();

        self.uploading.store(true, Ordering::SeqCst);
        let result = if size >= CHUNKED_UPLOAD_THRESHOLD {
            client.upload_chunked(source, &name, size, &folder).await
        } else {
            client.upload_small(source, &name, &folder).await
        };
        self.uploading.store(false, Ordering::SeqCst);

        let tag = result.map_err(vendor_error)?;
        info!("uploaded {} ({} bytes) as {}", name, size, tag);

        self.open_folder(&folder).await
    }

    /// First phase of a download: fetch metadata and open the byte stream.
    ///
    /// Dropping the returned value abandons the transfer without side
    /// effects; this is the dialog-cancel path.
    pub async fn start_download(&self, file_id: &str) -> Result<PendingDownload, BrowserError> {
        let client = self.session()?;

        let info = client.file_info(file_id).await.map_err(vendor_error)?;
        let stream = client.download(file_id).await.map_err(vendor_error)?;

        Ok(PendingDownload {
            name: info.name,
            stream,
        })
    }
}

/// A download that has opened its byte stream but not yet been given a
/// destination.
pub struct PendingDownload {
    name: String,
    stream: ByteStream,
}

impl std::fmt::Debug for PendingDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingDownload")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PendingDownload {
    /// Filename to suggest in the save dialog.
    pub fn suggested_name(&self) -> &str {
        &self.name
    }

    /// Pipe the byte stream into `dest` and flush it.
    pub async fn save_to(mut self, dest: &Path) -> Result<(), BrowserError> {
        let mut file = File::create(dest).await?;

        while let Some(chunk) = self.stream.next().await {
            let chunk = chunk.map_err(vendor_error)?;
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(())
    }
}
