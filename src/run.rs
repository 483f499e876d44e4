//! End-to-end run: decode the third record, count, report.

use std::io::{BufWriter, Read, Write};

use crate::{
    config::{Config, OutputFormat},
    decoder::decode_sequence,
    error::KnucError,
    reducer::{count_all, FRAGMENT_LENGTHS},
    report::{Report, FREQUENCY_LENGTHS, QUERIES},
};

#[cfg(feature = "tracing")]
use tracing::info_span;

/// Decodes the third record from `reader` and builds the standard report.
///
/// # Errors
///
/// Returns the first decode, counting, or lookup failure.
///
/// # Example
///
/// ```rust
/// use knucleotide::{config::Config, run::report};
///
/// let input = b">ONE\nAA\n>TWO\nCC\n>THREE\nGGTATT\n";
/// let report = report(&input[..], &Config::new())?;
/// assert_eq!(report.counts[0].kmer, "GGT");
/// assert_eq!(report.counts[0].count, 1);
/// # Ok::<(), knucleotide::error::KnucError>(())
/// ```
pub fn report<R: Read>(reader: R, config: &Config) -> Result<Report, KnucError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("report", threads = config.get_threads()).entered();

    let seq = decode_sequence(reader, config)?;
    let tables = count_all(&seq, &FRAGMENT_LENGTHS, config.get_threads())?;
    Report::build(seq.len(), &tables, &FREQUENCY_LENGTHS, &QUERIES)
}

/// Runs the whole pipeline and writes the report to `writer`.
///
/// Nothing is written unless the report was built successfully.
///
/// # Errors
///
/// Returns [`KnucError::WriteError`] if output cannot be written, or any
/// error from [`report`].
pub fn run<R: Read, W: Write>(reader: R, writer: W, config: &Config) -> Result<(), KnucError> {
    let report = report(reader, config)?;
    let rendered = match config.get_format() {
        OutputFormat::Text => report.to_text(),
        OutputFormat::Json => {
            let mut json = report.to_json()?;
            json.push('\n');
            json
        }
    };

    let mut buf = BufWriter::new(writer);
    buf.write_all(rendered.as_bytes())
        .and_then(|()| buf.flush())
        .map_err(|source| KnucError::WriteError { source })
}
