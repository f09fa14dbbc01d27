use std::path::PathBuf;

/// Open a native file picker dialog.
///
/// Returns the selected file path, or None if cancelled.
pub async fn pick_file() -> Option<PathBuf> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Choose a file to claim")
        .pick_file()
        .await?;
    Some(handle.path().to_path_buf())
}
