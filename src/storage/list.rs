//! First-page folder listing

use super::client::R2Client;
use super::types::{Entry, EntryKind, FolderListing, StorageResult};

/// Name segment of a key or folder prefix.
pub(crate) fn leaf_name(key: &str) -> String {
    key.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(key)
        .to_string()
}

/// List the first page of entries directly under a folder prefix.
///
/// Only one page is requested; folders larger than the vendor's default
/// page size are truncated, which the `truncated` flag records.
pub async fn list_folder(client: &R2Client, folder_id: &str) -> StorageResult<FolderListing> {
    let mut request = client
        .s3
        .list_objects_v2()
        .bucket(&client.bucket)
        .delimiter("/");

    if !folder_id.is_empty() {
        request = request.prefix(folder_id);
    }

    let response = request.send().await?;

    let mut entries: Vec<Entry> = response
        .common_prefixes()
        .iter()
        .filter_map(|prefix| {
            let id = prefix.prefix()?.to_string();
            Some(Entry {
                name: leaf_name(&id),
                id,
                kind: EntryKind::Folder,
                size: 0,
                last_modified: String::new(),
                url: None,
            })
        })
        .collect();

    entries.extend(response.contents().iter().filter_map(|obj| {
        let key = obj.key()?.to_string();
        // Skip directory markers
        if key.ends_with('/') {
            return None;
        }
        Some(Entry {
            name: leaf_name(&key),
            id: key,
            kind: EntryKind::File,
            size: obj.size().unwrap_or(0),
            last_modified: obj
                .last_modified()
                .map(|dt| dt.to_string())
                .unwrap_or_default(),
            url: None,
        })
    }));

    Ok(FolderListing {
        entries,
        truncated: response.is_truncated().unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::leaf_name;

    #[test]
    fn leaf_name_strips_parent_segments() {
        assert_eq!(leaf_name("a.txt"), "a.txt");
        assert_eq!(leaf_name("photos/2024/a.txt"), "a.txt");
        assert_eq!(leaf_name("photos/"), "photos");
        assert_eq!(leaf_name("photos/2024/"), "2024");
    }
}
