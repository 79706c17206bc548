//! Autosubs - Automated Video Subtitling
//!
//! Batch-converts video files into MKV containers carrying two AI generated
//! subtitle tracks (spoken language and English translation), using the
//! whisper command-line tool and ffmpeg.

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod workflow;
