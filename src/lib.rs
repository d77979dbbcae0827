pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::MashupConfig;
pub use crate::core::{engine::MashupEngine, pipeline::MashupPipeline, workdir::WorkDir};
pub use utils::error::{MashupError, Result};
