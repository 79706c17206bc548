// OpenAI Whisper command-line implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{AutosubError, Result};
use super::{TranscriberTrait, Transcript, TranscriptSegment, TranscriptionMapper, TranscriptionTask};

/// OpenAI Whisper specific JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    pub segments: Vec<OpenAIWhisperSegment>,
    pub language: Option<String>,
}

/// OpenAI Whisper specific segment format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Mapper for OpenAI Whisper format to [`Transcript`]
pub struct OpenAIWhisperMapper;

impl TranscriptionMapper<OpenAIWhisperOutput> for OpenAIWhisperMapper {
    fn to_transcript(whisper_output: OpenAIWhisperOutput) -> Result<Transcript> {
        let segments = whisper_output.segments
            .into_iter()
            .map(|seg| {
                if !(seg.start.is_finite() && seg.end.is_finite()) || seg.start < 0.0 || seg.end < seg.start {
                    return Err(AutosubError::Transcriber(format!(
                        "Invalid segment timing {}..{}",
                        seg.start, seg.end
                    )));
                }
                Ok(TranscriptSegment {
                    start: seg.start,
                    end: seg.end,
                    text: seg.text,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Transcript {
            segments,
            language: whisper_output.language.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

/// Transcriber backed by the `whisper` command-line tool
pub struct OpenAITranscriber {
    config: TranscriberConfig,
}

impl OpenAITranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    /// Arguments for one whisper pass writing JSON into `output_dir`
    pub fn build_args(&self, audio_path: &Path, task: TranscriptionTask, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            audio_path.into(),
            "--model".into(),
            self.config.model.as_str().into(),
            "--task".into(),
            task.as_str().into(),
            "--output_format".into(),
            "json".into(),
            "--output_dir".into(),
            output_dir.into(),
            "--verbose".into(),
            "False".into(),
        ];
        args.extend(self.config.extra_args.iter().map(OsString::from));
        args
    }

    fn parse_output(json_content: &str) -> Result<Transcript> {
        let whisper_output: OpenAIWhisperOutput = serde_json::from_str(json_content)?;
        OpenAIWhisperMapper::to_transcript(whisper_output)
    }
}

#[async_trait]
impl TranscriberTrait for OpenAITranscriber {
    async fn transcribe(&self, audio_path: &Path, task: TranscriptionTask) -> Result<Transcript> {
        info!(
            "Running whisper ({} model, {}) on {}",
            self.config.model, task, audio_path.display()
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| AutosubError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let args = self.build_args(audio_path, task, output_dir);
        debug!("Executing whisper command: {} {:?}", self.config.binary_path, args);

        let output = Command::new(&self.config.binary_path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AutosubError::Transcriber(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AutosubError::Transcriber(format!("Whisper {} failed: {}", task, stderr)));
        }

        let audio_stem = audio_path.file_stem()
            .ok_or_else(|| AutosubError::Transcriber("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = tokio::fs::read_to_string(&json_file).await
            .map_err(|e| AutosubError::Transcriber(format!("Failed to read output: {}", e)))?;

        let transcript = Self::parse_output(&json_content)?;
        info!(
            "Whisper {} produced {} segments (language: {})",
            task, transcript.segments.len(), transcript.language
        );
        Ok(transcript)
    }

    async fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("--help")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AutosubError::Transcriber(format!("whisper command not found: {}", e)))?;

        if output.status.success() {
            info!("Whisper command-line tool is available");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(AutosubError::Transcriber(format!(
                "Whisper not available. Install with: pip install openai-whisper\nError: {}",
                stderr
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSize;

    const SAMPLE: &str = r#"{
        "text": " Hola. Buenos dias.",
        "segments": [
            {"id": 0, "seek": 0, "start": 0.0, "end": 1.52, "text": " Hola.", "tokens": [1, 2],
             "temperature": 0.0, "avg_logprob": -0.2, "compression_ratio": 0.8, "no_speech_prob": 0.01},
            {"id": 1, "seek": 0, "start": 1.52, "end": 3.0, "text": " Buenos dias.", "tokens": [3],
             "temperature": 0.0, "avg_logprob": -0.3, "compression_ratio": 0.9, "no_speech_prob": 0.02}
        ],
        "language": "es"
    }"#;

    #[test]
    fn test_parse_whisper_json() {
        let transcript = OpenAITranscriber::parse_output(SAMPLE).unwrap();
        assert_eq!(transcript.language, "es");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].start, 0.0);
        assert_eq!(transcript.segments[0].end, 1.52);
        assert_eq!(transcript.segments[1].text, " Buenos dias.");
    }

    #[test]
    fn test_missing_language_and_empty_segments() {
        let transcript = OpenAITranscriber::parse_output(r#"{"text": "", "segments": []}"#).unwrap();
        assert_eq!(transcript.language, "unknown");
        assert!(transcript.segments.is_empty());
    }

    #[test]
    fn test_rejects_inverted_timing() {
        let json = r#"{"segments": [{"start": 2.0, "end": 1.0, "text": "x"}], "language": "en"}"#;
        assert!(matches!(
            OpenAITranscriber::parse_output(json),
            Err(AutosubError::Transcriber(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(
            OpenAITranscriber::parse_output("{\"segments\": ["),
            Err(AutosubError::Json(_))
        ));
    }

    #[test]
    fn test_build_args() {
        let transcriber = OpenAITranscriber::new(TranscriberConfig {
            binary_path: "whisper".to_string(),
            model: ModelSize::Tiny,
            extra_args: vec!["--fp16".to_string(), "False".to_string()],
        });

        let args = transcriber.build_args(
            Path::new("/tmp/run/audio.wav"),
            TranscriptionTask::Translate,
            Path::new("/tmp/out"),
        );
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            args,
            vec![
                "/tmp/run/audio.wav", "--model", "tiny", "--task", "translate",
                "--output_format", "json", "--output_dir", "/tmp/out",
                "--verbose", "False", "--fp16", "False",
            ]
        );
    }
}
