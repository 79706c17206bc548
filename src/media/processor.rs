use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::{AutosubError, Result};
use super::{MediaProcessorTrait, MediaCommandBuilder, MuxRequest, TARGET_EXTENSION};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(config.binary_path, config.global_options);

        Self { command_builder }
    }
}

/// Hidden sibling of `output_path` that ffmpeg writes before the final rename
fn staging_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_path.with_file_name(format!(".{}.{}.{}", stem, Uuid::new_v4().simple(), TARGET_EXTENSION))
}

#[async_trait]
impl MediaProcessorTrait for MediaProcessorImpl {
    async fn remux(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        info!("Remuxing {} -> {}", input_path.display(), output_path.display());

        self.command_builder.remux(input_path, output_path).execute().await?;

        info!("Remux completed");
        Ok(())
    }

    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder.extract_audio(video_path, audio_path).execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn convert_subtitle(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        info!("Converting subtitles {} -> {}", input_path.display(), output_path.display());

        self.command_builder.convert_subtitle(input_path, output_path).execute().await
    }

    async fn mux_subtitles(&self, request: &MuxRequest) -> Result<()> {
        info!(
            "Muxing {} with {} subtitle streams -> {}",
            request.video_path.display(),
            request.subtitles.len(),
            request.output_path.display()
        );

        let staging = staging_path(&request.output_path);
        let outcome = match self.command_builder.mux_subtitles(request, &staging).execute().await {
            Ok(()) => tokio::fs::rename(&staging, &request.output_path).await.map_err(AutosubError::from),
            Err(e) => Err(e),
        };

        if outcome.is_err() && staging.exists() {
            if let Err(e) = tokio::fs::remove_file(&staging).await {
                warn!("Failed to remove partial output {}: {}", staging.display(), e);
            }
        }
        outcome?;

        info!("Subtitle muxing completed successfully");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder.version_check().execute().await?;
        info!("Media processor is available");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        let staging = staging_path(Path::new("output/movie.mkv"));
        assert_eq!(staging.parent(), Some(Path::new("output")));

        let name = staging.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".movie."));
        assert!(name.ends_with(".mkv"));
        assert_ne!(staging, staging_path(Path::new("output/movie.mkv")));
    }

    #[tokio::test]
    async fn test_failed_mux_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let processor = MediaProcessorImpl::new(MediaConfig {
            binary_path: "/nonexistent/ffmpeg-binary".to_string(),
            global_options: Vec::new(),
        });

        let request = MuxRequest {
            video_path: dir.path().join("clip.mkv"),
            subtitles: [
                crate::media::SubtitleTrack {
                    path: dir.path().join("a.srt"),
                    language: "es".to_string(),
                    title: "AI Generated: Spanish".to_string(),
                },
                crate::media::SubtitleTrack {
                    path: dir.path().join("b.srt"),
                    language: "en".to_string(),
                    title: "AI Generated: English".to_string(),
                },
            ],
            output_path: dir.path().join("out.mkv"),
        };

        assert!(processor.mux_subtitles(&request).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
