//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

use crate::{
    config::{Config, OutputFormat},
    error::KnucError,
    input::Input,
};

/// Counts nucleotide and k-mer frequencies in the third record of a FASTA stream.
#[derive(Parser, Debug)]
#[command(name = "knucleotide")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to a FASTA file, optionally gzip-compressed (reads stdin if omitted or "-")
    pub path: Option<PathBuf>,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long, value_parser = parse_threads)]
    pub threads: Option<usize>,

    /// Size in bytes of each block read from the input
    #[arg(short, long, value_parser = parse_block_size)]
    pub block_size: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress informational output on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// The input source named on the command line, stdin by default.
    pub fn input(&self) -> Input {
        Input::from_option(self.path.as_deref())
    }

    /// Builds the run configuration from the parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`KnucError::InvalidConfig`] for a zero thread count or block size.
    pub fn config(&self) -> Result<Config, KnucError> {
        let mut config = Config::new().format(self.format);
        if let Some(threads) = self.threads {
            config = config.threads(threads)?;
        }
        if let Some(block_size) = self.block_size {
            config = config.block_size(block_size)?;
        }
        Ok(config)
    }
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        return Err("thread count must be at least 1".to_string());
    }
    Ok(n)
}

fn parse_block_size(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        return Err("block size must be at least 1".to_string());
    }
    Ok(n)
}
