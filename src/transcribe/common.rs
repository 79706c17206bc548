use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// A timed piece of recognized speech, in seconds from the start of the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Timed transcript with the language detected in the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
}

impl Transcript {
    pub fn new(language: impl Into<String>, segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            language: language.into(),
        }
    }
}

/// Which inference pass to run over the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionTask {
    /// Text in the spoken language
    Transcribe,
    /// Text translated to English
    Translate,
}

impl TranscriptionTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Translate => "translate",
        }
    }
}

impl fmt::Display for TranscriptionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for converting service-specific transcription output into a [`Transcript`]
pub trait TranscriptionMapper<T> {
    fn to_transcript(service_result: T) -> Result<Transcript>;
}
