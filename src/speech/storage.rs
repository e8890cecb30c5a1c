//! File-backed storage for synthesized audio

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::SpeechError;

/// Directory under the media root that holds word audio
pub const AUDIO_DIR: &str = "tts_audio";

/// Writes audio files under a media root and builds their public URLs
#[derive(Debug, Clone)]
pub struct AudioStorage {
    root: PathBuf,
    base_url: String,
}

impl AudioStorage {
    /// `base_url` is the public prefix the media root is served under
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            root: root.into(),
            base_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative path the audio for word `id` is stored under
    ///
    /// Distinct codenames can sanitize to the same stem, so the id is part
    /// of the file name.
    pub fn relative_path(codename: &str, id: Uuid, extension: &str) -> String {
        let file_stem: String = codename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}/{}-{}.{}", AUDIO_DIR, file_stem, id.simple(), extension)
    }

    /// Write `audio` and return its path relative to the media root
    pub async fn save(
        &self,
        codename: &str,
        id: Uuid,
        extension: &str,
        audio: &[u8],
    ) -> Result<String, SpeechError> {
        let relative = Self::relative_path(codename, id, extension);
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, audio).await?;

        Ok(relative)
    }

    /// Public URL of a stored file
    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}{}", self.base_url, relative_path.trim_start_matches('/'))
    }
}
