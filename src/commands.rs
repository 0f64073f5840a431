//! Tauri command layer
//!
//! Thin wrappers that lock the managed controller, bridge the native
//! dialogs, and flatten errors to strings for the frontend.

use std::path::PathBuf;

use serde::Serialize;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::Mutex;

use crate::controller::Browser;
use crate::storage::{self, Credential, Entry, R2Client};

/// Managed state: the controller behind one async mutex, so overlapping
/// commands serialize in arrival order.
pub struct AppState(pub Mutex<Browser<R2Client>>);

impl AppState {
    pub fn new() -> Self {
        AppState(Mutex::new(Browser::new()))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Event payload emitted on both edges of an upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadStatusChanged {
    pub uploading: bool,
}

/// Rebuild the session from a pasted credential string.
#[tauri::command]
pub async fn set_token(state: State<'_, AppState>, token: String) -> Result<(), String> {
    let credential = Credential::parse(&token);
    let client = storage::create_client(&credential);
    state.0.lock().await.set_session(client);
    Ok(())
}

/// List a folder and make it the current one.
#[tauri::command]
pub async fn open_folder(
    state: State<'_, AppState>,
    folder_id: String,
) -> Result<Vec<Entry>, String> {
    state
        .0
        .lock()
        .await
        .open_folder(&folder_id)
        .await
        .map_err(|e| e.to_string())
}

/// Pick a local file as the upload source using the native dialog.
#[tauri::command]
pub async fn select_upload_source(app: AppHandle) -> Result<Option<String>, String> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    app.dialog()
        .file()
        .set_title("Select File to Upload")
        .pick_file(move |file_path| {
            let result = file_path.map(|p| p.to_string());
            let _ = tx.send(result);
        });

    rx.await.map_err(|_| "Dialog was closed".to_string())
}

/// Upload a local file into the current folder and return the refreshed
/// listing.
#[tauri::command]
pub async fn upload_file(
    app: AppHandle,
    state: State<'_, AppState>,
    source: String,
) -> Result<Vec<Entry>, String> {
    let _ = app.emit("upload-status-changed", UploadStatusChanged { uploading: true });

    let result = state
        .0
        .lock()
        .await
        .upload(PathBuf::from(&source).as_path())
        .await;

    let _ = app.emit("upload-status-changed", UploadStatusChanged { uploading: false });

    result.map_err(|e| e.to_string())
}

/// Download a file: prompt for a save destination and pipe the byte stream
/// into it. Returns `None` when the user cancels the dialog.
#[tauri::command]
pub async fn download_file(
    app: AppHandle,
    state: State<'_, AppState>,
    file_id: String,
) -> Result<Option<String>, String> {
    let pending = {
        let browser = state.0.lock().await;
        browser
            .start_download(&file_id)
            .await
            .map_err(|e| e.to_string())?
    };

    let (tx, rx) = tokio::sync::oneshot::channel();

    app.dialog()
        .file()
        .set_file_name(pending.suggested_name())
        .save_file(move |file_path| {
            let result = file_path.map(|p| p.to_string());
            let _ = tx.send(result);
        });

    let dest = match rx.await.map_err(|_| "Dialog was closed".to_string())? {
        Some(dest) => dest,
        // The user cancelled the save prompt
        None => return Ok(None),
    };

    pending
        .save_to(PathBuf::from(&dest).as_path())
        .await
        .map_err(|e| e.to_string())?;

    Ok(Some(dest))
}
