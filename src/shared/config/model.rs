use serde::Deserialize;

use crate::compression::CompressionKind;
use crate::stream::output_buffer::DEFAULT_BLOCK_SIZE;

/// Per-column stream settings, supplied by the surrounding writer.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    #[serde(default)]
    pub compression: CompressionKind,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            compression: CompressionKind::None,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}
