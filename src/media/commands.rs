use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AutosubError, Result};
use super::MuxRequest;

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<OsString>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Fail instead of overwriting an existing output
    pub fn no_overwrite(self) -> Self {
        self.arg("-n")
    }

    /// Select streams for the output
    pub fn map<S: AsRef<OsStr>>(self, specifier: S) -> Self {
        self.arg("-map").arg(specifier)
    }

    /// Set video codec
    pub fn video_codec<S: AsRef<OsStr>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: AsRef<OsStr>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set subtitle codec
    pub fn subtitle_codec<S: AsRef<OsStr>>(self, codec: S) -> Self {
        self.arg("-c:s").arg(codec)
    }

    /// Copy video stream
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Copy audio stream
    pub fn copy_audio(self) -> Self {
        self.audio_codec("copy")
    }

    /// Copy every selected stream
    pub fn copy_all(self) -> Self {
        self.arg("-c").arg("copy")
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Set audio sample rate
    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    /// Set audio channels
    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    /// Tag a subtitle output stream with a metadata key/value
    pub fn subtitle_metadata(self, stream: usize, key: &str, value: &str) -> Self {
        self.arg(format!("-metadata:s:s:{}", stream))
            .arg(format!("{}={}", key, value))
    }

    /// Execute the command
    pub async fn execute(&self) -> Result<()> {
        debug!("Executing media processing command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AutosubError::Media(format!("Failed to execute media processor: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AutosubError::Media(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Builder for the ffmpeg invocations the pipeline needs
pub struct MediaCommandBuilder {
    binary_path: String,
    global_options: Vec<String>,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S: Into<String>>(binary_path: S, global_options: Vec<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            global_options,
        }
    }

    fn base<S: Into<String>>(&self, description: S) -> MediaCommand {
        MediaCommand::new(&self.binary_path, description).args(&self.global_options)
    }

    /// Build container remux command (stream copy, regenerated timestamps)
    pub fn remux<P: AsRef<Path>>(&self, input_path: P, output_path: P) -> MediaCommand {
        self.base("Remux")
            .no_overwrite()
            .arg("-fflags").arg("+genpts")
            .input(input_path)
            .copy_all()
            .output(output_path)
    }

    /// Build audio extraction command
    pub fn extract_audio<P: AsRef<Path>>(&self, video_path: P, audio_path: P) -> MediaCommand {
        self.base("Audio extraction")
            .overwrite()
            .input(video_path)
            .no_video()
            .audio_codec("pcm_s16le")
            .audio_sample_rate(16000)
            .audio_channels(1)
            .output(audio_path)
    }

    /// Build subtitle format conversion command (format chosen by extension)
    pub fn convert_subtitle<P: AsRef<Path>>(&self, input_path: P, output_path: P) -> MediaCommand {
        self.base("Subtitle conversion")
            .overwrite()
            .input(input_path)
            .output(output_path)
    }

    /// Build the command muxing copied video/audio with two tagged subtitle streams
    pub fn mux_subtitles(&self, request: &MuxRequest, output_path: &Path) -> MediaCommand {
        let mut cmd = self.base("Subtitle muxing")
            .overwrite()
            .input(&request.video_path);

        for track in &request.subtitles {
            cmd = cmd.input(&track.path);
        }

        cmd = cmd.map("0:v").map("0:a");
        for index in 0..request.subtitles.len() {
            cmd = cmd.map((index + 1).to_string());
        }

        cmd = cmd.copy_video().copy_audio().subtitle_codec("srt");

        for (index, track) in request.subtitles.iter().enumerate() {
            cmd = cmd
                .subtitle_metadata(index, "language", &track.language)
                .subtitle_metadata(index, "title", &track.title);
        }

        cmd.output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check")
            .arg("-version")
    }
}
