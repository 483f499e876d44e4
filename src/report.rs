//! Ranked frequency blocks and literal counts.
//!
//! The text rendering is:
//!
//! ```text
//! A 30.295
//! T 30.151
//! ...
//! <blank line>
//! AA 9.177
//! ...
//! <blank line>
//! 1471758	GGT
//! ...
//! ```

use std::fmt;

use serde::Serialize;

use crate::{
    counter::FrequencyTable,
    error::KnucError,
    kmer::KmerLength,
    reducer::Tables,
};

/// Lengths reported as full frequency distributions.
pub const FREQUENCY_LENGTHS: [usize; 2] = [1, 2];

/// Literals whose exact counts are reported, in output order.
pub const QUERIES: [&str; 5] = [
    "GGT",
    "GGTA",
    "GGTATT",
    "GGTATTTTAATT",
    "GGTATTTTAATTTATAGT",
];

/// One line of a frequency block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyLine {
    pub kmer: String,
    pub count: u64,
    pub percent: f64,
}

/// All k-mers of one length, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyBlock {
    pub k: usize,
    pub total: u64,
    pub entries: Vec<FrequencyLine>,
}

/// The exact count of one literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralCount {
    pub kmer: String,
    pub count: u64,
}

/// The complete report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub frequencies: Vec<FrequencyBlock>,
    pub counts: Vec<LiteralCount>,
}

/// Ranks the entries of `table`, expressing each count as a percentage of
/// `total`.
pub fn frequencies(table: &FrequencyTable, total: u64) -> FrequencyBlock {
    let entries = table
        .to_string_counts()
        .into_iter()
        .map(|(kmer, count)| FrequencyLine {
            kmer,
            count,
            percent: percent(count, total),
        })
        .collect();
    FrequencyBlock {
        k: table.k().get(),
        total,
        entries,
    }
}

/// Looks up the exact count of `literal` across `tables`.
///
/// # Errors
///
/// Returns an error if `literal` is not a packable nucleotide string.
pub fn lookup_count(tables: &Tables, literal: &str) -> Result<LiteralCount, KnucError> {
    Ok(LiteralCount {
        kmer: literal.to_string(),
        count: tables.query(literal)?,
    })
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// Number of windows of length `k` in a sequence of `len` bases.
pub const fn window_count(len: usize, k: usize) -> u64 {
    (len + 1).saturating_sub(k) as u64
}

impl Report {
    /// Assembles the report for a sequence of `len` bases.
    ///
    /// # Errors
    ///
    /// Returns an error if a requested length or literal cannot be packed.
    pub fn build(
        len: usize,
        tables: &Tables,
        frequency_lengths: &[usize],
        queries: &[&str],
    ) -> Result<Self, KnucError> {
        let frequencies = frequency_lengths
            .iter()
            .map(|&k| -> Result<FrequencyBlock, KnucError> {
                let merged = tables.merged(KmerLength::new(k)?)?;
                Ok(frequencies(&merged, window_count(len, k)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let counts = queries
            .iter()
            .map(|literal| lookup_count(tables, literal))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            frequencies,
            counts,
        })
    }

    /// Renders the plain text report.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, KnucError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for FrequencyBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.entries {
            writeln!(f, "{} {:.3}", line.kmer, line.percent)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for LiteralCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\t{}", self.count, self.kmer)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.frequencies {
            write!(f, "{block}")?;
        }
        for count in &self.counts {
            write!(f, "{count}")?;
        }
        Ok(())
    }
}
