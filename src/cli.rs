use clap::Parser;
use std::path::PathBuf;

use crate::config::ModelSize;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Transcribe and subtitle videos.",
    after_help = "This tool processes video files to extract audio, transcribe the audio, generate \
                  subtitles, and add the subtitles to the video. If the video files are not in MKV \
                  format, they will be converted to MKV before processing."
)]
pub struct Args {
    /// The path to the input file or directory containing video files
    pub input: PathBuf,

    /// The output directory where processed videos will be saved
    #[arg(long, default_value = "output/")]
    pub output: PathBuf,

    /// The model to use for transcription and translation [default: base]
    #[arg(long, value_enum)]
    pub model: Option<ModelSize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
