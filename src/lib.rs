//! # knucleotide
//!
//! Counts nucleotide and k-mer frequencies in the third record of a FASTA
//! stream.
//!
//! The input is decoded by a block pipeline: one thread reads raw blocks,
//! several threads translate bytes to 2-bit codes in place, and a collator
//! stitches the blocks back together in order. The resulting [`Sequence`] is
//! then counted for every length in [`FRAGMENT_LENGTHS`] on a rayon pool,
//! one task per `(k, offset)` pair, and the partial tables are reduced into
//! a [`Report`].
//!
//! ## Example
//!
//! ```rust
//! use knucleotide::{config::Config, run::run};
//!
//! let input = b">ONE\nAC\n>TWO\nGT\n>THREE Homo sapiens\nGGTA\nTTTT\n";
//! let mut out = Vec::new();
//! run(&input[..], &mut out, &Config::new())?;
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with("T 62.500\n"));
//! assert!(text.contains("1\tGGTA\n"));
//! # Ok::<(), knucleotide::error::KnucError>(())
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): spans and events for the decode and count stages
//!
//! [`Sequence`]: sequence::Sequence
//! [`FRAGMENT_LENGTHS`]: reducer::FRAGMENT_LENGTHS
//! [`Report`]: report::Report

pub mod cli;
pub mod code;
pub mod config;
pub mod counter;
pub mod decoder;
pub mod error;
pub mod input;
pub mod kmer;
pub mod reducer;
pub mod report;
pub mod run;
pub mod sequence;
