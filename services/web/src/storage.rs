//! Media storage for uploaded profile pictures

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::forms::ValidPicture;

/// Sub-directory of the media root holding profile pictures
pub const PROFILE_PICS_DIR: &str = "profile_pics";

/// Filesystem-backed media storage
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a profile picture under a fresh name
    ///
    /// Returns the path relative to the media root, as stored on the profile.
    pub async fn save_profile_pic(&self, picture: &ValidPicture) -> std::io::Result<String> {
        let dir = self.root.join(PROFILE_PICS_DIR);
        fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), picture.extension);
        fs::write(dir.join(&file_name), &picture.bytes).await?;

        let relative = format!("{}/{}", PROFILE_PICS_DIR, file_name);
        info!("Stored profile picture: {}", relative);
        Ok(relative)
    }

    /// Remove a stored file; failures are logged, not returned
    pub async fn discard(&self, relative: &str) {
        if let Err(e) = fs::remove_file(self.root.join(relative)).await {
            warn!("Failed to remove {}: {}", relative, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    #[tokio::test]
    async fn test_save_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        let relative = storage
            .save_profile_pic(&ValidPicture {
                extension: "png".to_string(),
                bytes: Bytes::from_static(b"\x89PNG"),
            })
            .await
            .unwrap();

        assert!(relative.starts_with("profile_pics/"));
        assert!(relative.ends_with(".png"));

        let absolute = dir.path().join(&relative);
        assert_eq!(std::fs::read(&absolute).unwrap(), b"\x89PNG");

        storage.discard(&relative).await;
        assert!(!absolute.exists());
    }
}
