//! The decoded, immutable code buffer shared by all counting tasks.

use bytes::Bytes;

use crate::{
    code::{nucleotide, CODE_TABLE},
    error::{InvalidBaseError, KnucError},
};

/// A nucleotide sequence stored as 2-bit codes, one per byte.
///
/// Cloning is cheap: clones share the same buffer, which is never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    codes: Bytes,
}

impl Sequence {
    /// Builds a sequence from nucleotide letters, ignoring case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use knucleotide::sequence::Sequence;
    ///
    /// let seq = Sequence::from_nucleotides("GATtaca")?;
    /// assert_eq!(seq.codes(), &[2, 0, 3, 3, 0, 1, 0]);
    /// # Ok::<(), knucleotide::error::KnucError>(())
    /// ```
    pub fn from_nucleotides(seq: &str) -> Result<Self, KnucError> {
        let codes = seq
            .bytes()
            .enumerate()
            .map(|(position, base)| {
                CODE_TABLE.code(base).ok_or(InvalidBaseError {
                    base,
                    position: position as u64,
                })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self::from_decoded(codes))
    }

    /// Takes ownership of a buffer the decoder has already validated.
    ///
    /// The buffer is moved, not copied.
    pub(crate) fn from_decoded(codes: Vec<u8>) -> Self {
        Self {
            codes: Bytes::from(codes),
        }
    }

    /// Returns the codes, one per base, each in `0..=3`.
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Returns the number of bases.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the sequence holds no bases.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Renders the sequence back to uppercase letters.
    pub fn to_nucleotides(&self) -> String {
        self.codes
            .iter()
            .map(|&code| char::from(nucleotide(code)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nucleotides_round_trip() {
        let seq = Sequence::from_nucleotides("acgtTGCA").unwrap();
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.to_nucleotides(), "ACGTTGCA");
    }

    #[test]
    fn from_nucleotides_rejects_n() {
        let err = Sequence::from_nucleotides("ACNT").unwrap_err();
        assert!(matches!(
            err,
            KnucError::InvalidBase {
                base: b'N',
                position: 2
            }
        ));
    }

    #[test]
    fn clones_share_buffer() {
        let seq = Sequence::from_nucleotides("ACGT").unwrap();
        let other = seq.clone();
        assert!(std::ptr::eq(seq.codes().as_ptr(), other.codes().as_ptr()));
    }

    #[test]
    fn decoded_buffer_is_moved_not_copied() {
        let codes = vec![2, 2, 3, 0];
        let ptr = codes.as_ptr();
        let seq = Sequence::from_decoded(codes);
        assert!(std::ptr::eq(seq.codes().as_ptr(), ptr));
    }
}
