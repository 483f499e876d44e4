//! Parallel scheduling of fragment counting tasks and reduction of their
//! partial tables.
//!
//! One [`FragmentTask`] is created per `(k, offset)` pair and all of them run
//! on a fixed-size [`rayon`] pool against the same read-only [`Sequence`].
//! Tasks share no mutable state, so no locking is needed while counting.

use rayon::prelude::*;

use crate::{
    counter::{FragmentTask, FrequencyTable},
    error::KnucError,
    kmer::{pack_literal, KmerLength},
    sequence::Sequence,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// The k-mer lengths counted for a standard report.
pub const FRAGMENT_LENGTHS: [usize; 7] = [1, 2, 3, 4, 6, 12, 18];

/// Builds the task list for the given k-mer lengths, in order.
///
/// # Errors
///
/// Returns [`KnucError::InvalidKmerLength`] for any length outside 1..=31.
pub fn plan(lengths: &[usize]) -> Result<Vec<FragmentTask>, KnucError> {
    let mut tasks = Vec::with_capacity(lengths.iter().sum());
    for &k in lengths {
        tasks.extend(FragmentTask::for_length(KmerLength::new(k)?));
    }
    Ok(tasks)
}

/// Partial frequency tables, one per fragment task.
#[derive(Debug, Clone)]
pub struct Tables {
    tables: Vec<FrequencyTable>,
}

impl Tables {
    /// Partial tables built for `k`.
    pub fn for_length(&self, k: KmerLength) -> impl Iterator<Item = &FrequencyTable> {
        self.tables.iter().filter(move |table| table.k() == k)
    }

    /// Combines every partial table for `k` into one.
    ///
    /// The result is empty if nothing was counted for `k`.
    pub fn merged(&self, k: KmerLength) -> Result<FrequencyTable, KnucError> {
        let mut merged = FrequencyTable::new(k);
        for table in self.for_length(k) {
            merged.merge(table)?;
        }
        Ok(merged)
    }

    /// Occurrences of `literal`, summed over the partial tables of its length.
    ///
    /// # Errors
    ///
    /// Returns an error if `literal` is not a packable nucleotide string.
    pub fn query(&self, literal: &str) -> Result<u64, KnucError> {
        let (k, key) = pack_literal(literal)?;
        Ok(self.for_length(k).map(|table| table.get(key)).sum())
    }

    /// Number of partial tables, one per fragment task.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no task was scheduled.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Counts every k-mer length in `lengths` over `seq` using `threads` workers.
///
/// Blocks until every task has finished.
///
/// # Errors
///
/// Returns an error if a length is out of range or the pool cannot be built.
///
/// # Example
///
/// ```rust
/// use knucleotide::{kmer::KmerLength, reducer::count_all, sequence::Sequence};
///
/// let seq = Sequence::from_nucleotides("GGTATTGGTA")?;
/// let tables = count_all(&seq, &[1, 2, 4], 2)?;
/// assert_eq!(tables.len(), 1 + 2 + 4);
/// assert_eq!(tables.query("GGTA")?, 2);
/// assert_eq!(tables.merged(KmerLength::new(2)?)?.total(), 9);
/// # Ok::<(), knucleotide::error::KnucError>(())
/// ```
pub fn count_all(seq: &Sequence, lengths: &[usize], threads: usize) -> Result<Tables, KnucError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("count_all", bases = seq.len(), threads).entered();

    let tasks = plan(lengths)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("knuc-count-{i}"))
        .build()
        .map_err(|e| KnucError::ThreadPool {
            details: e.to_string(),
        })?;

    #[cfg(feature = "tracing")]
    info!(tasks = tasks.len(), "Scheduling fragment tasks");

    let tables = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                let table = task.count(seq);
                #[cfg(feature = "tracing")]
                debug!(
                    k = task.k().get(),
                    offset = task.offset(),
                    distinct = table.len(),
                    "Fragment counted"
                );
                table
            })
            .collect::<Vec<_>>()
    });

    Ok(Tables { tables })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> Sequence {
        Sequence::from_nucleotides(s).unwrap()
    }

    #[test]
    fn plan_creates_one_task_per_offset() {
        let tasks = plan(&FRAGMENT_LENGTHS).unwrap();
        assert_eq!(tasks.len(), 1 + 2 + 3 + 4 + 6 + 12 + 18);
        assert_eq!(tasks[0], FragmentTask::new(1, 0).unwrap());
        assert_eq!(tasks[1], FragmentTask::new(2, 0).unwrap());
        assert_eq!(tasks[2], FragmentTask::new(2, 1).unwrap());
    }

    #[test]
    fn plan_rejects_unpackable_length() {
        assert!(matches!(
            plan(&[1, 32]),
            Err(KnucError::InvalidKmerLength { k: 32, .. })
        ));
    }

    #[test]
    fn merged_totals_match_window_counts() {
        let s = seq("GGTATTTTAATTTATAGTA");
        let tables = count_all(&s, &[1, 2], 3).unwrap();
        let one = tables.merged(KmerLength::new(1).unwrap()).unwrap();
        let two = tables.merged(KmerLength::new(2).unwrap()).unwrap();
        assert_eq!(one.total(), s.len() as u64);
        assert_eq!(two.total(), s.len() as u64 - 1);
    }

    #[test]
    fn query_sums_across_offsets() {
        let tables = count_all(&seq("GGTGGTGGT"), &[3], 2).unwrap();
        assert_eq!(tables.query("GGT").unwrap(), 3);
        assert_eq!(tables.query("GTG").unwrap(), 2);
        assert_eq!(tables.query("CCC").unwrap(), 0);
    }

    #[test]
    fn query_for_uncounted_length_is_zero() {
        let tables = count_all(&seq("GGTA"), &[1], 1).unwrap();
        assert_eq!(tables.query("GGTA").unwrap(), 0);
    }

    #[test]
    fn short_sequence_yields_zero_for_long_query() {
        let tables = count_all(&seq("GGTAT"), &FRAGMENT_LENGTHS, 4).unwrap();
        assert_eq!(tables.query("GGTATTTTAATTTATAGT").unwrap(), 0);
    }

    #[test]
    fn result_does_not_depend_on_thread_count() {
        let s = seq(&"GATTACAGGTATTTTAATT".repeat(20));
        let k = KmerLength::new(2).unwrap();
        let one = count_all(&s, &FRAGMENT_LENGTHS, 1).unwrap();
        let many = count_all(&s, &FRAGMENT_LENGTHS, 8).unwrap();
        assert_eq!(one.merged(k).unwrap(), many.merged(k).unwrap());
    }
}
