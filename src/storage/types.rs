//! Entry model and shared result alias

use serde::{Deserialize, Serialize};

pub type StorageResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Chunks of a streamed download body.
pub type ByteStream = futures_util::stream::BoxStream<'static, StorageResult<bytes::Bytes>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EntryKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "folder")]
    Folder,
    #[serde(rename = "web_link")]
    WebLink,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Folder => write!(f, "folder"),
            EntryKind::WebLink => write!(f, "web_link"),
        }
    }
}

impl From<String> for EntryKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "file" => EntryKind::File,
            "folder" => EntryKind::Folder,
            "web_link" => EntryKind::WebLink,
            _ => EntryKind::File,
        }
    }
}

/// One row of a folder listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub kind: EntryKind,
    pub size: i64,
    pub last_modified: String,
    pub url: Option<String>,
}

/// First page of a folder's contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderListing {
    pub entries: Vec<Entry>,
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::EntryKind;

    #[test]
    fn entry_kind_display_matches_expected_strings() {
        assert_eq!(EntryKind::File.to_string(), "file");
        assert_eq!(EntryKind::Folder.to_string(), "folder");
        assert_eq!(EntryKind::WebLink.to_string(), "web_link");
    }

    #[test]
    fn entry_kind_from_string_defaults_to_file() {
        let kind: EntryKind = "unknown".to_string().into();
        assert_eq!(kind, EntryKind::File);
    }

    #[test]
    fn entry_kind_serializes_with_wire_names() {
        assert_eq!(
            serde_json::to_string(&EntryKind::WebLink).unwrap(),
            "\"web_link\""
        );
        assert_eq!(serde_json::to_string(&EntryKind::Folder).unwrap(), "\"folder\"");
    }
}
