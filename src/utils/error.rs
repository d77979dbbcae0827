use thiserror::Error;

#[derive(Error, Debug)]
pub enum MashupError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Email delivery failed: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Email message could not be built: {0}")]
    EmailBuildError(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Video search failed: {message}")]
    SearchError { message: String },

    #[error("Download of video {video_id} failed: {message}")]
    DownloadError { video_id: String, message: String },

    #[error("{tool} failed: {message}")]
    MediaError { tool: String, message: String },

    #[error("No audio clips found in {dir}")]
    NoClipsError { dir: String },
}

impl MashupError {
    pub fn media(tool: &str, message: impl Into<String>) -> Self {
        Self::MediaError {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::SearchError { .. } => {
                format!("Could not search for videos: {}", self)
            }
            Self::SmtpError(_) | Self::EmailBuildError(_) | Self::AddressError(_) => {
                format!("Sending the notification email failed: {}", self)
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => format!("Invalid configuration: {}", self),
            Self::MediaError { .. } | Self::NoClipsError { .. } => {
                format!("Audio processing failed: {}", self)
            }
            _ => format!("Error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "Check your network connection and the search endpoint URL",
            Self::SearchError { .. } => "Check that the YouTube API key is valid and has quota left",
            Self::SmtpError(_) => "Check the SMTP host, port and credentials in the config file",
            Self::EmailBuildError(_) | Self::AddressError(_) => {
                "Check the sender and recipient email addresses"
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration value and run again",
            Self::MediaError { .. } => "Make sure ffmpeg and ffprobe are installed and on PATH",
            Self::DownloadError { .. } => "Make sure yt-dlp is installed and up to date",
            Self::NoClipsError { .. } => {
                "None of the videos could be downloaded; try a different singer or count"
            }
            Self::IoError(_) => "Check that the working directory is writable",
            Self::SerializationError(_) => "The search provider returned an unexpected response",
        }
    }
}

pub type Result<T> = std::result::Result<T, MashupError>;
