use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::artifacts::{IntermediateFiles, ScratchDir};
use crate::config::Config;
use crate::error::{AutosubError, Result};
use crate::language;
use crate::media::{
    has_target_extension, target_path, MediaProcessorFactory, MediaProcessorTrait, MuxRequest,
    SubtitleTrack, TARGET_EXTENSION,
};
use crate::subtitle::build_subtitles;
use crate::transcribe::{Transcript, TranscriberFactory, TranscriberTrait, TranscriptionTask};

/// Suffix of the subtitle file holding the spoken-language transcript
pub const ORIGINAL_SUBTITLE_SUFFIX: &str = "_subtitles";
/// Suffix of the subtitle file holding the English translation
pub const TRANSLATED_SUBTITLE_SUFFIX: &str = "_subtitles_translated";

const AUDIO_FILE_NAME: &str = "audio.wav";
const TRANSLATION_LANGUAGE: &str = "en";
const TRACK_TITLE_PREFIX: &str = "AI Generated: ";

/// Per-file pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    ExtractAudio,
    Transcribe,
    BuildSubs,
    Mux,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Normalize => "NORMALIZE",
            Stage::ExtractAudio => "EXTRACT_AUDIO",
            Stage::Transcribe => "TRANSCRIBE",
            Stage::BuildSubs => "BUILD_SUBS",
            Stage::Mux => "MUX",
            Stage::Cleanup => "CLEANUP",
        };
        f.write_str(name)
    }
}

/// A file the batch could not handle, with the rendered error
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a run over one file or one directory
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written
    pub processed: Vec<PathBuf>,
    /// Videos whose pipeline failed
    pub failed: Vec<FileFailure>,
    /// Files the directory walk could not normalize
    pub skipped: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Title tag of a subtitle stream, e.g. `AI Generated: Spanish`
pub fn subtitle_title(language_code: &str) -> String {
    format!("{}{}", TRACK_TITLE_PREFIX, language::display_name(language_code))
}

/// `<work_dir>/<base><suffix>.ass`
pub fn subtitle_path(work_dir: &Path, base_name: &str, suffix: &str) -> PathBuf {
    work_dir.join(format!("{}{}.ass", base_name, suffix))
}

/// `<output_dir>/<base>.mkv`
pub fn output_path_for(video_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let base_name = file_base_name(video_path)?;
    Ok(output_dir.join(format!("{}.{}", base_name, TARGET_EXTENSION)))
}

/// Target-format files directly inside `dir`, sorted by name
pub fn find_top_level_videos(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut videos = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| AutosubError::Io(e.into()))?;
        if entry.file_type().is_file() && has_target_extension(entry.path()) {
            videos.push(entry.into_path());
        }
    }
    Ok(videos)
}

fn file_base_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| AutosubError::InvalidInput(format!("Invalid video filename: {}", path.display())))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub struct Workflow {
    config: Config,
    transcriber: Box<dyn TranscriberTrait>,
    media: Box<dyn MediaProcessorTrait>,
}

impl Workflow {
    /// Build the workflow on the default whisper and ffmpeg implementations
    pub async fn new(config: Config) -> Result<Self> {
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        let media = MediaProcessorFactory::create_processor(config.media.clone());

        // Check dependencies
        media.check_availability().await?;
        transcriber.check_availability().await?;

        Ok(Self::with_components(config, transcriber, media))
    }

    pub fn with_components(
        config: Config,
        transcriber: Box<dyn TranscriberTrait>,
        media: Box<dyn MediaProcessorTrait>,
    ) -> Self {
        Self {
            config,
            transcriber,
            media,
        }
    }

    /// Process a file or every video of a directory into `output_dir`
    pub async fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output_dir: Q) -> Result<BatchReport> {
        let input = input.as_ref();
        let output_dir = output_dir.as_ref();

        fs::create_dir_all(output_dir).await?;

        if input.is_dir() {
            self.process_directory(input, output_dir).await
        } else if input.is_file() {
            let output = self.process_single_file(input, output_dir).await?;
            Ok(BatchReport {
                processed: vec![output],
                ..BatchReport::default()
            })
        } else {
            Err(AutosubError::InvalidInput(input.display().to_string()))
        }
    }

    /// Normalize one file and run the pipeline over it
    pub async fn process_single_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
    ) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        info!("Processing single file: {}", input_path.display());

        if !input_path.exists() {
            return Err(AutosubError::FileNotFound(input_path.display().to_string()));
        }

        let video_path = self.normalize(input_path).await.map_err(|e| e.at(Stage::Normalize))?;
        self.process_video(&video_path, output_dir.as_ref()).await
    }

    /// Normalize every file under `input_dir` (recursively), then run the
    /// pipeline over the target-format files directly inside `input_dir`.
    ///
    /// Files in subdirectories are normalized but not processed. A failing
    /// file is recorded in the report and the batch moves on.
    pub async fn process_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchReport> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(AutosubError::InvalidInput(format!("{} is not a directory", input_dir.display())));
        }

        let mut report = BatchReport::default();

        let mut to_normalize = Vec::new();
        for entry in WalkDir::new(input_dir).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && !has_target_extension(entry.path()) {
                        to_normalize.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().unwrap_or(input_dir).to_path_buf();
                    warn!("Failed to read {}: {}", path.display(), e);
                    report.skipped.push(FileFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!("Normalizing {} files to .{}", to_normalize.len(), TARGET_EXTENSION);
        for path in to_normalize {
            if let Err(e) = self.normalize(&path).await {
                warn!("Failed to normalize {}: {}", path.display(), e);
                report.skipped.push(FileFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }

        let videos = find_top_level_videos(input_dir)?;
        info!("Found {} video files to process", videos.len());

        let progress = ProgressBar::new(videos.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            progress.set_style(style.progress_chars("#>-"));
        }

        for video_path in videos {
            progress.set_message(
                video_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(),
            );
            match self.process_video(&video_path, output_dir).await {
                Ok(output) => {
                    info!("Successfully processed: {}", video_path.display());
                    report.processed.push(output);
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", video_path.display(), e);
                    report.failed.push(FileFailure {
                        path: video_path,
                        error: e.to_string(),
                    });
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Directory done: {} processed, {} failed, {} not normalized",
            report.processed.len(),
            report.failed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Return a path to `input_path` in the target container format.
    ///
    /// Target-format inputs are returned unchanged without touching the
    /// filesystem; anything else is remuxed into a sibling file.
    pub async fn normalize<P: AsRef<Path>>(&self, input_path: P) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        if has_target_extension(input_path) {
            return Ok(input_path.to_path_buf());
        }

        let output_path = target_path(input_path);
        self.media.remux(input_path, &output_path).await?;
        Ok(output_path)
    }

    /// Run the per-file pipeline and return the output path
    pub async fn process_video<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        video_path: P,
        output_dir: Q,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        let keep = self.config.workflow.keep_intermediates;
        let work_dir = self.config.workflow.work_dir.as_path();

        info!("[{}] {}", Stage::Normalize, video_path.as_ref().display());
        let video_path = self.normalize(video_path).await.map_err(|e| e.at(Stage::Normalize))?;

        let base_name = file_base_name(&video_path)?;
        let output_path = output_path_for(&video_path, output_dir)?;
        if is_same_file(&video_path, &output_path) {
            return Err(AutosubError::InvalidInput(format!(
                "Output {} would overwrite the input video",
                output_path.display()
            )));
        }
        fs::create_dir_all(work_dir).await?;

        // Dropped on every exit path, removing whatever was created so far.
        let mut intermediates = IntermediateFiles::new(keep);

        info!("[{}] {}", Stage::ExtractAudio, video_path.display());
        let scratch = ScratchDir::create(keep, work_dir).map_err(|e| e.at(Stage::ExtractAudio))?;
        let audio_path = self
            .extract_audio(&video_path, scratch.path())
            .await
            .map_err(|e| e.at(Stage::ExtractAudio))?;

        info!("[{}] {} ({} model)", Stage::Transcribe, audio_path.display(), self.config.transcriber.model);
        let (original, translated) = self
            .transcribe_both(&audio_path)
            .await
            .map_err(|e| e.at(Stage::Transcribe))?;

        info!("[{}] {}", Stage::BuildSubs, base_name);
        let original_ass =
            intermediates.track(subtitle_path(work_dir, &base_name, ORIGINAL_SUBTITLE_SUFFIX));
        let translated_ass =
            intermediates.track(subtitle_path(work_dir, &base_name, TRANSLATED_SUBTITLE_SUFFIX));
        build_subtitles(&original, &original_ass)
            .await
            .map_err(|e| e.at(Stage::BuildSubs))?;
        build_subtitles(&translated, &translated_ass)
            .await
            .map_err(|e| e.at(Stage::BuildSubs))?;

        info!("[{}] {}", Stage::Mux, output_path.display());
        self.mux(&video_path, [&original_ass, &translated_ass], &output_path, &original.language)
            .await
            .map_err(|e| e.at(Stage::Mux))?;

        info!("[{}] {}", Stage::Cleanup, base_name);
        intermediates.cleanup();
        drop(scratch);

        Ok(output_path)
    }

    async fn extract_audio(&self, video_path: &Path, scratch_dir: &Path) -> Result<PathBuf> {
        let audio_path = scratch_dir.join(AUDIO_FILE_NAME);
        self.media.extract_audio(video_path, &audio_path).await?;
        Ok(audio_path)
    }

    /// Two passes over the same audio: spoken language, then English
    async fn transcribe_both(&self, audio_path: &Path) -> Result<(Transcript, Transcript)> {
        let original = self
            .transcriber
            .transcribe(audio_path, TranscriptionTask::Transcribe)
            .await?;
        let translated = self
            .transcriber
            .transcribe(audio_path, TranscriptionTask::Translate)
            .await?;

        info!(
            "Detected language: {} ({})",
            original.language,
            language::display_name(&original.language)
        );
        debug!(
            "Translate pass reported language {}; the track is tagged {}",
            translated.language, TRANSLATION_LANGUAGE
        );
        Ok((original, translated))
    }

    /// Convert both ASS files to SRT and mux them into `output_path`.
    ///
    /// The translated track is always tagged English; the language reported
    /// by the translate pass is only logged.
    async fn mux(
        &self,
        video_path: &Path,
        subtitle_files: [&Path; 2],
        output_path: &Path,
        language_code: &str,
    ) -> Result<()> {
        let [original_ass, translated_ass] = subtitle_files;

        let mut converted = IntermediateFiles::new(self.config.workflow.keep_intermediates);
        let original_srt = converted.track(original_ass.with_extension("srt"));
        let translated_srt = converted.track(translated_ass.with_extension("srt"));

        self.media.convert_subtitle(original_ass, &original_srt).await?;
        self.media.convert_subtitle(translated_ass, &translated_srt).await?;

        let request = MuxRequest {
            video_path: video_path.to_path_buf(),
            subtitles: [
                SubtitleTrack {
                    path: original_srt,
                    language: language_code.to_string(),
                    title: subtitle_title(language_code),
                },
                SubtitleTrack {
                    path: translated_srt,
                    language: TRANSLATION_LANGUAGE.to_string(),
                    title: subtitle_title(TRANSLATION_LANGUAGE),
                },
            ],
            output_path: output_path.to_path_buf(),
        };
        debug!("Mux request: {:?}", request);

        self.media.mux_subtitles(&request).await
    }
}
