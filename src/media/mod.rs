// Media processing over ffmpeg
//
// - Processor: MediaProcessorTrait implementation
// - Commands: ffmpeg command builders

pub mod commands;
pub mod processor;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Extension of the container every input is normalized to
pub const TARGET_EXTENSION: &str = "mkv";

/// Whether `path` already carries the target container extension
pub fn has_target_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TARGET_EXTENSION))
}

/// Sibling of `path` with the same stem and the target container extension
pub fn target_path(path: &Path) -> PathBuf {
    path.with_extension(TARGET_EXTENSION)
}

/// One subtitle stream to attach, with its stream tags
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTrack {
    pub path: PathBuf,
    pub language: String,
    pub title: String,
}

/// Combine request: copied video/audio plus exactly two subtitle streams
#[derive(Debug, Clone, PartialEq)]
pub struct MuxRequest {
    pub video_path: PathBuf,
    pub subtitles: [SubtitleTrack; 2],
    pub output_path: PathBuf,
}

/// Main trait for media processing operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MediaProcessorTrait: Send + Sync {
    /// Repackage a file into another container without re-encoding
    async fn remux(&self, input_path: &Path, output_path: &Path) -> Result<()>;

    /// Extract audio from video as uncompressed WAV
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Convert a subtitle file to the format implied by the output extension
    async fn convert_subtitle(&self, input_path: &Path, output_path: &Path) -> Result<()>;

    /// Combine video, audio and subtitle streams into `request.output_path`
    async fn mux_subtitles(&self, request: &MuxRequest) -> Result<()>;

    /// Check if media processor is available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessorTrait> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_extension_detection() {
        assert!(has_target_extension(Path::new("videos/a.mkv")));
        assert!(has_target_extension(Path::new("videos/a.MKV")));
        assert!(!has_target_extension(Path::new("videos/a.mp4")));
        assert!(!has_target_extension(Path::new("videos/mkv")));
        assert!(!has_target_extension(Path::new("videos/a.mkv.part")));
    }

    #[test]
    fn test_target_path_keeps_stem_and_directory() {
        assert_eq!(target_path(Path::new("videos/a.mov")), PathBuf::from("videos/a.mkv"));
        assert_eq!(target_path(Path::new("videos/a.b.mp4")), PathBuf::from("videos/a.b.mkv"));
        assert_eq!(target_path(Path::new("videos/noext")), PathBuf::from("videos/noext.mkv"));
    }
}
