// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod ffmpeg;
pub mod smtp;
pub mod youtube;
pub mod ytdlp;

pub use ffmpeg::FfmpegProcessor;
pub use smtp::SmtpNotifier;
pub use youtube::YouTubeSearch;
pub use ytdlp::YtDlpFetcher;
