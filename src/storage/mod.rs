//! Storage module - vendor client operations
//!
//! This module is organized into submodules:
//! - `types`: entry model and result alias
//! - `session`: credential parsing and client construction
//! - `client`: the client trait and the S3-backed implementation
//! - `list`: first-page folder listing
//! - `upload`: upload operations (simple, multipart)
//! - `download`: metadata and streamed downloads

pub mod client;
mod download;
mod list;
pub mod session;
mod types;
mod upload;

// Re-export the client boundary
pub use client::{R2Client, StorageClient};

// Re-export credential handling
pub use session::{create_client, Credential};

// Re-export core types
pub use types::{ByteStream, Entry, EntryKind, FolderListing, StorageResult};
