//! Per-offset k-mer counting.
//!
//! Counting every window of length `k` is split into `k` independent tasks:
//! the task for `offset` scans positions `offset, offset + k, offset + 2k, ...`.
//! Together the tasks for one `k` visit each window start exactly once, and
//! each task writes only to its own [`FrequencyTable`].

use std::iter::StepBy;
use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;

use crate::{
    error::KnucError,
    kmer::{pack, pack_literal, unpack_to_string, KmerLength},
    sequence::Sequence,
};

/// Describes one counting task: which k, and which residue class of start
/// positions modulo k.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentTask {
    k: KmerLength,
    offset: usize,
}

impl FragmentTask {
    /// Creates a task descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`KnucError::InvalidKmerLength`] if `k` cannot be packed and
    /// [`KnucError::InvalidConfig`] if `offset >= k`.
    pub fn new(k: usize, offset: usize) -> Result<Self, KnucError> {
        let k = KmerLength::new(k)?;
        if offset >= k.get() {
            return Err(KnucError::InvalidConfig {
                details: format!("fragment offset {offset} must be below k = {k}"),
            });
        }
        Ok(Self { k, offset })
    }

    /// Returns the `k` tasks covering every window of length `k`.
    pub fn for_length(k: KmerLength) -> impl Iterator<Item = Self> {
        (0..k.get()).map(move |offset| Self { k, offset })
    }

    /// Returns the k-mer length this task counts.
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Returns the first window start this task scans.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Window start positions scanned by this task in a sequence of `len`.
    pub fn positions(&self, len: usize) -> StepBy<RangeInclusive<usize>> {
        let k = self.k.get();
        // An empty range when no window fits.
        let (start, end) = match len.checked_sub(k) {
            Some(last) if self.offset <= last => (self.offset, last),
            _ => (1, 0),
        };
        (start..=end).step_by(k)
    }

    /// Scans `seq` and counts every window this task is responsible for.
    pub fn count(&self, seq: &Sequence) -> FrequencyTable {
        let codes = seq.codes();
        let mut table = FrequencyTable::new(self.k);
        for position in self.positions(codes.len()) {
            table.increment(pack(codes, position, self.k));
        }
        table
    }
}

/// Occurrence counts of packed k-mers for a single `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    k: KmerLength,
    counts: FxHashMap<u64, u64>,
}

impl FrequencyTable {
    /// Creates an empty table for `k`.
    pub fn new(k: KmerLength) -> Self {
        Self {
            k,
            counts: FxHashMap::default(),
        }
    }

    /// Returns the k-mer length every key in this table was packed with.
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Adds one occurrence of `key`.
    #[inline]
    pub fn increment(&mut self, key: u64) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Count for a packed key, zero if absent.
    pub fn get(&self, key: u64) -> u64 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Count for a nucleotide literal.
    ///
    /// Returns zero if the literal's length differs from this table's `k`.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal is not a packable nucleotide string.
    pub fn get_literal(&self, literal: &str) -> Result<u64, KnucError> {
        let (k, key) = pack_literal(literal)?;
        Ok(if k == self.k { self.get(key) } else { 0 })
    }

    /// Adds every count of `other` into this table.
    ///
    /// # Errors
    ///
    /// Returns [`KnucError::KmerLengthMismatch`] if the tables were built
    /// for different `k`.
    pub fn merge(&mut self, other: &Self) -> Result<(), KnucError> {
        if other.k != self.k {
            return Err(KnucError::KmerLengthMismatch {
                expected: self.k.get(),
                found: other.k.get(),
            });
        }
        self.counts.reserve(other.counts.len());
        for (&key, &count) in &other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
        Ok(())
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct k-mers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over `(key, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&key, &count)| (key, count))
    }

    /// Entries ordered by descending count, ties by ascending key.
    ///
    /// Ascending key order is alphabetical order of the k-mers.
    pub fn sorted(&self) -> Vec<(u64, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// Unpacks all keys to strings.
    pub fn to_string_counts(&self) -> Vec<(String, u64)> {
        self.sorted()
            .into_iter()
            .map(|(key, count)| (unpack_to_string(key, self.k), count))
            .collect()
    }
}
