pub mod engine;
pub mod pipeline;
pub mod workdir;

pub use crate::domain::model::{DownloadReport, MashupOutcome, MashupRequest, SearchQuery, VideoId};
pub use crate::domain::ports::{MediaProcessor, Notifier, Pipeline, VideoFetcher, VideoSearch};
pub use crate::utils::error::Result;
