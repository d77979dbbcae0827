pub mod toml_config;

use crate::core::workdir::AUDIO_EXTENSION;
use crate::domain::model::{MashupRequest, MAX_VIDEO_COUNT};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "yt-mashup")]
#[command(about = "Build an audio mashup from a singer's YouTube videos and email a notice")]
pub struct CliConfig {
    /// Path to TOML configuration file (API key, SMTP, tools)
    #[arg(short, long, default_value = "mashup.toml")]
    pub config: PathBuf,

    /// Singer to search for
    #[arg(short, long)]
    pub singer: String,

    /// Number of videos to download
    #[arg(short = 'n', long, default_value = "5")]
    pub count: u32,

    /// Seconds to keep from the start of each clip
    #[arg(short, long, default_value = "20")]
    pub duration: u64,

    /// Output file name for the mashup
    #[arg(short, long)]
    pub output: PathBuf,

    /// Address to notify when the mashup is ready
    #[arg(short, long)]
    pub email: String,

    /// Override the working directory from the config file
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log time and memory per stage")]
    pub monitor: bool,

    /// Dry run - show what would be done without executing
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn to_request(&self) -> MashupRequest {
        MashupRequest {
            singer: self.singer.trim().to_string(),
            video_count: self.count,
            clip_seconds: self.duration,
            output_file: self.output.clone(),
            recipient: self.email.trim().to_string(),
        }
    }
}

impl Validate for MashupRequest {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("singer", &self.singer)?;
        validation::validate_range("count", self.video_count, 1, MAX_VIDEO_COUNT)?;
        validation::validate_positive_number("duration", self.clip_seconds, 1)?;
        validation::validate_path("output", &self.output_file.to_string_lossy())?;
        // 輸出檔必須是 mp3，否則不會被排除在片段掃描之外
        validation::validate_file_extension("output", &self.output_file, &[AUDIO_EXTENSION])?;
        validation::validate_email("email", &self.recipient)?;
        Ok(())
    }
}
