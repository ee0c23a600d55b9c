//! Changelog file output

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::Result;

/// Directory, relative to the working directory, saved changelogs go to
pub const CHANGELOG_DIR: &str = "changelog";

/// File name for a saved changelog: `changelog-<release>.md`, or the current
/// epoch milliseconds when there is no release.
pub fn changelog_file_name(release: Option<&str>) -> String {
    let suffix = match release.filter(|r| !r.is_empty()) {
        Some(release) => release.replace(['/', '\\'], "-"),
        None => Utc::now().timestamp_millis().to_string(),
    };
    format!("changelog-{}.md", suffix)
}

/// Write the changelog under `<base_dir>/changelog/`, creating the directory
/// if needed.
pub async fn save_changelog(base_dir: &Path, release: Option<&str>, text: &str) -> Result<PathBuf> {
    let dir = base_dir.join(CHANGELOG_DIR);
    tokio::fs::create_dir_all(&dir).await?;

    let path = dir.join(changelog_file_name(release));
    tokio::fs::write(&path, text).await?;
    info!(path = %path.display(), bytes = text.len(), "saved changelog");
    Ok(path)
}
