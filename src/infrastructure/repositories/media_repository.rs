use crate::domain::audio::AudioArtifact;
use async_trait::async_trait;
use std::path::PathBuf;

/// Destination for synthesized audio files
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Store the artifact under its filename, replacing any existing file.
    /// Returns the full path written.
    async fn persist(&self, artifact: &AudioArtifact) -> std::io::Result<PathBuf>;
}

/// Writes files straight into Anki's `collection.media` directory
pub struct FsMediaRepository {
    media_dir: PathBuf,
}

impl FsMediaRepository {
    pub fn new(media_dir: PathBuf) -> Self {
        Self { media_dir }
    }
}

#[async_trait]
impl MediaRepository for FsMediaRepository {
    async fn persist(&self, artifact: &AudioArtifact) -> std::io::Result<PathBuf> {
        let path = self.media_dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.bytes).await?;

        tracing::debug!(
            path = %path.display(),
            size = artifact.bytes.len(),
            "Audio file written"
        );

        Ok(path)
    }
}
