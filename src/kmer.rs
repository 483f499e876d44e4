//! Packing k-mers of nucleotide codes into 64-bit keys and back.
//!
//! A k-mer of length `k` occupies the low `2 * k` bits of a `u64`, with the
//! first base of the window in the most significant pair. Keys are only
//! meaningful together with the `k` they were packed with.

use crate::{
    code::{nucleotide, CODE_TABLE},
    error::{InvalidBaseError, KmerLengthError, KnucError},
};

/// Shortest supported k-mer.
pub const MIN_K: u8 = 1;

/// Longest supported k-mer; keeps a packed key within 62 bits.
pub const MAX_K: u8 = 31;

/// A validated k-mer length in `MIN_K..=MAX_K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerLength(u8);

impl KmerLength {
    /// Validates `k`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use knucleotide::kmer::KmerLength;
    ///
    /// assert_eq!(KmerLength::new(18).unwrap().get(), 18);
    /// assert!(KmerLength::new(0).is_err());
    /// assert!(KmerLength::new(32).is_err());
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k >= MIN_K as usize && k <= MAX_K as usize {
            Ok(Self(k as u8))
        } else {
            Err(KmerLengthError {
                k,
                min: MIN_K,
                max: MAX_K,
            })
        }
    }

    /// Returns the length as a `usize`.
    #[inline]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for KmerLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Packs the `k` codes starting at `offset` into a key.
///
/// `codes` must only hold values `0..=3` and contain the whole window.
#[inline]
pub fn pack(codes: &[u8], offset: usize, k: KmerLength) -> u64 {
    codes[offset..offset + k.get()]
        .iter()
        .fold(0u64, |key, &code| (key << 2) | u64::from(code))
}

/// Unpacks a key into uppercase nucleotide bytes.
#[allow(clippy::cast_possible_truncation)]
pub fn unpack_to_bytes(key: u64, k: KmerLength) -> Vec<u8> {
    let k = k.get();
    (0..k)
        .map(|i| key << ((i * 2) + 64 - (k * 2)))
        .map(|isolated| isolated >> 62)
        .map(|code| nucleotide(code as u8))
        .collect()
}

/// Unpacks a key into a nucleotide string.
pub fn unpack_to_string(key: u64, k: KmerLength) -> String {
    unpack_to_bytes(key, k).into_iter().map(char::from).collect()
}

/// Packs a literal nucleotide string, returning its length alongside the key.
///
/// Bases are matched case-insensitively.
///
/// # Example
///
/// ```rust
/// use knucleotide::kmer::{pack_literal, unpack_to_string};
///
/// let (k, key) = pack_literal("GGTa").unwrap();
/// assert_eq!(k.get(), 4);
/// assert_eq!(unpack_to_string(key, k), "GGTA");
/// ```
pub fn pack_literal(literal: &str) -> Result<(KmerLength, u64), KnucError> {
    let k = KmerLength::new(literal.len())?;
    let mut key = 0u64;
    for (position, &byte) in literal.as_bytes().iter().enumerate() {
        let code = CODE_TABLE.code(byte).ok_or(InvalidBaseError {
            base: byte,
            position: position as u64,
        })?;
        key = (key << 2) | u64::from(code);
    }
    Ok((k, key))
}
