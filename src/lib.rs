mod commands;
pub mod controller;
pub mod storage;

use commands::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            commands::set_token,
            commands::open_folder,
            commands::select_upload_source,
            commands::upload_file,
            commands::download_file
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
