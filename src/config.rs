use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use crate::error::{Result, AutosubError};

fn default_whisper_binary() -> String {
    "whisper".to_string()
}

fn default_ffmpeg_binary() -> String {
    "ffmpeg".to_string()
}

fn default_media_global_options() -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ]
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub transcriber: TranscriberConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Whisper model size, trading accuracy for speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    Small,
    #[default]
    Base,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Base => "base",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper command-line tool
    #[serde(default = "default_whisper_binary")]
    pub binary_path: String,
    /// Model size used for both the transcribe and translate passes
    #[serde(default)]
    pub model: ModelSize,
    /// Additional arguments appended to every whisper invocation
    /// e.g. ["--device", "cuda"] or ["--fp16", "False"]
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    #[serde(default = "default_ffmpeg_binary")]
    pub binary_path: String,
    /// Options placed before every ffmpeg invocation's inputs
    #[serde(default = "default_media_global_options")]
    pub global_options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Directory receiving the per-video subtitle files while a video is processed
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Leave audio and subtitle intermediates on disk (debugging)
    #[serde(default)]
    pub keep_intermediates: bool,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary_path: default_whisper_binary(),
            model: ModelSize::Base,
            extra_args: Vec::new(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: default_ffmpeg_binary(),
            global_options: default_media_global_options(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            keep_intermediates: false,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AutosubError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AutosubError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AutosubError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [transcriber]
            binary_path = "/opt/whisper/bin/whisper"
            model = "tiny"
            "#,
        )
        .unwrap();

        assert_eq!(config.transcriber.binary_path, "/opt/whisper/bin/whisper");
        assert_eq!(config.transcriber.model, ModelSize::Tiny);
        assert!(config.transcriber.extra_args.is_empty());
        assert_eq!(config.media.binary_path, "ffmpeg");
        assert_eq!(config.media.global_options, vec!["-hide_banner", "-loglevel", "error"]);
        assert_eq!(config.workflow.work_dir, PathBuf::from("."));
        assert!(!config.workflow.keep_intermediates);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosubs.toml");

        let mut config = Config::default();
        config.transcriber.model = ModelSize::Large;
        config.workflow.keep_intermediates = true;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.transcriber.model, ModelSize::Large);
        assert!(loaded.workflow.keep_intermediates);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[transcriber]\nbinary_path = \"whisper\"\nmodel = \"medium\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, AutosubError::Toml(_)));
    }

    #[test]
    fn test_sections_without_binary_paths_use_defaults() {
        let config: Config = toml::from_str("[transcriber]\nmodel = \"tiny\"\n").unwrap();
        assert_eq!(config.transcriber.binary_path, "whisper");
        assert_eq!(config.transcriber.model, ModelSize::Tiny);

        let config: Config = toml::from_str("[media]\nglobal_options = []\n").unwrap();
        assert_eq!(config.media.binary_path, "ffmpeg");
        assert!(config.media.global_options.is_empty());
        assert_eq!(config.transcriber.binary_path, "whisper");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AutosubError::Config(_)));
    }
}
