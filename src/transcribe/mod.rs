// Transcription seam
//
// The pipeline only depends on `TranscriberTrait`; the default implementation
// drives the OpenAI Whisper command-line tool:
// - common: transcript types and the output mapper trait
// - openai: whisper CLI implementation

pub mod common;
pub mod openai;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::path::Path;

pub use common::*;
use crate::config::TranscriberConfig;
use crate::error::Result;

/// Main trait for transcription operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Run one inference pass over an audio file
    async fn transcribe(&self, audio_path: &Path, task: TranscriptionTask) -> Result<Transcript>;

    /// Check if the transcriber is available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the default transcriber implementation (whisper CLI)
    pub fn create_default(config: TranscriberConfig) -> Box<dyn TranscriberTrait> {
        Box::new(openai::OpenAITranscriber::new(config))
    }
}
