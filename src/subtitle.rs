use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::error::{AutosubError, Result};
use crate::transcribe::Transcript;

const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
Collisions: Normal
PlayResX: 384
PlayResY: 288

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Write an ASS subtitle file with one dialogue event per transcript segment.
///
/// Returns `output_path` unchanged.
pub async fn build_subtitles<P: AsRef<Path>>(
    transcript: &Transcript,
    output_path: P,
) -> Result<PathBuf> {
    let output_path = output_path.as_ref();
    info!(
        "Generating ASS file: {} ({} cues)",
        output_path.display(),
        transcript.segments.len()
    );

    let content = render_ass(transcript)?;
    fs::write(output_path, content).await?;

    Ok(output_path.to_path_buf())
}

/// Render a transcript as an ASS document
pub fn render_ass(transcript: &Transcript) -> Result<String> {
    let mut ass_content = String::from(ASS_HEADER);

    for segment in &transcript.segments {
        writeln!(
            ass_content,
            "Dialogue: 0,{},{},Default,,0,0,0,,{}",
            format_ass_time(segment.start),
            format_ass_time(segment.end),
            escape_ass_text(segment.text.trim())
        )
        .map_err(|e| AutosubError::Subtitle(format!("Failed to render cue: {}", e)))?;
    }

    Ok(ass_content)
}

/// Format time in seconds to ASS time format (H:MM:SS.cc)
fn format_ass_time(seconds: f64) -> String {
    let total_centis = (seconds.max(0.0) * 100.0).round() as u64;
    let hours = total_centis / 360_000;
    let minutes = (total_centis % 360_000) / 6_000;
    let secs = (total_centis % 6_000) / 100;
    let centis = total_centis % 100;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centis)
}

// Line breaks are hard breaks in ASS; braces would open override blocks.
fn escape_ass_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\n', "\\N")
        .replace('{', "(")
        .replace('}', ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::TranscriptSegment;

    fn parse_ass_time(s: &str) -> f64 {
        let (hms, centis) = s.split_once('.').unwrap();
        let parts: Vec<u64> = hms.split(':').map(|p| p.parse().unwrap()).collect();
        (parts[0] * 3600 + parts[1] * 60 + parts[2]) as f64 + centis.parse::<u64>().unwrap() as f64 / 100.0
    }

    fn dialogue_times(content: &str) -> Vec<(f64, f64)> {
        content
            .lines()
            .filter_map(|line| line.strip_prefix("Dialogue: "))
            .map(|rest| {
                let fields: Vec<&str> = rest.splitn(10, ',').collect();
                (parse_ass_time(fields[1]), parse_ass_time(fields[2]))
            })
            .collect()
    }

    #[test]
    fn test_format_ass_time() {
        assert_eq!(format_ass_time(0.0), "0:00:00.00");
        assert_eq!(format_ass_time(65.12), "0:01:05.12");
        assert_eq!(format_ass_time(3661.5), "1:01:01.50");
        assert_eq!(format_ass_time(59.999), "0:01:00.00");
    }

    #[test]
    fn test_cues_keep_order_and_timing() {
        let transcript = Transcript::new(
            "es",
            vec![
                TranscriptSegment { start: 0.0, end: 1.5, text: " Hola.".into() },
                TranscriptSegment { start: 1.5, end: 3.25, text: " Buenos dias.".into() },
                TranscriptSegment { start: 62.25, end: 64.75, text: "Adios".into() },
            ],
        );

        let content = render_ass(&transcript).unwrap();
        let times = dialogue_times(&content);

        assert_eq!(times, vec![(0.0, 1.5), (1.5, 3.25), (62.25, 64.75)]);
        assert!(content.contains(",,Hola.\n"));
        assert!(content.contains(",,Adios\n"));
        let hola = content.find("Hola.").unwrap();
        let adios = content.find("Adios").unwrap();
        assert!(hola < adios);
    }

    #[test]
    fn test_empty_transcript_is_valid() {
        let content = render_ass(&Transcript::new("en", vec![])).unwrap();
        assert!(content.contains("[Events]"));
        assert!(dialogue_times(&content).is_empty());
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(escape_ass_text("one\ntwo"), "one\\Ntwo");
        assert_eq!(escape_ass_text("a {b}, c"), "a (b), c");
    }

    #[tokio::test]
    async fn test_build_subtitles_returns_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("movie_subtitles.ass");
        let transcript = Transcript::new(
            "en",
            vec![TranscriptSegment { start: 0.5, end: 2.0, text: "Hello".into() }],
        );

        let written = build_subtitles(&transcript, &dest).await.unwrap();
        assert_eq!(written, dest);

        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(dialogue_times(&content), vec![(0.5, 2.0)]);
    }
}
