use thiserror::Error;

use crate::workflow::Stage;

#[derive(Error, Debug)]
pub enum AutosubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Transcription error: {0}")]
    Transcriber(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Subtitle error: {0}")]
    Subtitle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<AutosubError>,
    },
}

impl AutosubError {
    /// Attach the pipeline stage in which this error happened
    pub fn at(self, stage: Stage) -> Self {
        AutosubError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping stage wrappers
    pub fn root(&self) -> &AutosubError {
        match self {
            AutosubError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AutosubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapper_display_and_root() {
        let err = AutosubError::Media("boom".to_string()).at(Stage::Mux);
        assert_eq!(err.to_string(), "MUX failed: Media processing error: boom");
        assert!(matches!(err.root(), AutosubError::Media(msg) if msg == "boom"));
    }
}
