//! Run configuration.

use serde::Serialize;

use crate::error::KnucError;

/// Default size of a raw input block read by the decode pipeline.
pub const DEFAULT_BLOCK_SIZE: usize = 1 << 20;

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Frequency blocks followed by tab-separated literal counts
    #[default]
    Text,
    /// The same report as a JSON object
    Json,
}

/// Settings for a single run.
///
/// # Example
///
/// ```rust
/// use knucleotide::config::{Config, OutputFormat};
///
/// let config = Config::new().threads(4)?.format(OutputFormat::Json);
/// assert_eq!(config.get_threads(), 4);
/// # Ok::<(), knucleotide::error::KnucError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    threads: usize,
    block_size: usize,
    format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a configuration sized to the available processing units.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threads: num_cpus::get().max(1),
            block_size: DEFAULT_BLOCK_SIZE,
            format: OutputFormat::Text,
        }
    }

    /// Sets the number of worker threads.
    ///
    /// # Errors
    ///
    /// Returns [`KnucError::InvalidConfig`] if `threads` is zero.
    pub fn threads(mut self, threads: usize) -> Result<Self, KnucError> {
        if threads == 0 {
            return Err(KnucError::InvalidConfig {
                details: "thread count must be at least 1".to_string(),
            });
        }
        self.threads = threads;
        Ok(self)
    }

    /// Sets the raw read block size in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KnucError::InvalidConfig`] if `block_size` is zero.
    pub fn block_size(mut self, block_size: usize) -> Result<Self, KnucError> {
        if block_size == 0 {
            return Err(KnucError::InvalidConfig {
                details: "block size must be at least 1 byte".to_string(),
            });
        }
        self.block_size = block_size;
        Ok(self)
    }

    /// Sets the report output format.
    #[must_use]
    pub const fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Worker threads for the decode pipeline and the counting pool.
    pub const fn get_threads(&self) -> usize {
        self.threads
    }

    /// Raw read block size in bytes.
    pub const fn get_block_size(&self) -> usize {
        self.block_size
    }

    /// Report output format.
    pub const fn get_format(&self) -> OutputFormat {
        self.format
    }

    /// Number of parallel block decoders in the decode pipeline.
    ///
    /// The reader and the collator each take one thread.
    pub fn decoder_threads(&self) -> usize {
        self.threads.saturating_sub(2).max(1)
    }
}
