//! Byte to 2-bit nucleotide code translation.
//!
//! Nucleotides are encoded as `A = 0`, `C = 1`, `G = 2`, `T = 3`. Lowercase
//! (soft-masked) bases map to the same codes as uppercase ones. Every other
//! byte maps to [`INVALID`].

/// Sentinel returned for bytes that are not a nucleotide.
pub const INVALID: u8 = 0xff;

/// Nucleotide letters indexed by their code.
pub const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Bit that distinguishes lowercase from uppercase ASCII letters.
const CASE_BIT: u8 = 0x20;

/// Static lookup from input byte to nucleotide code.
pub struct CodeTable([u8; 256]);

/// The shared decoding table.
pub static CODE_TABLE: CodeTable = CodeTable::new();

impl CodeTable {
    const fn new() -> Self {
        let mut table = [INVALID; 256];
        let mut code = 0;
        while code < NUCLEOTIDES.len() {
            let upper = NUCLEOTIDES[code];
            table[upper as usize] = code as u8;
            table[(upper | CASE_BIT) as usize] = code as u8;
            code += 1;
        }
        Self(table)
    }

    /// Returns the code for `byte`, or [`INVALID`].
    #[inline]
    pub const fn lookup(&self, byte: u8) -> u8 {
        self.0[byte as usize]
    }

    /// Returns the code for `byte` if it is a nucleotide.
    #[inline]
    pub const fn code(&self, byte: u8) -> Option<u8> {
        match self.lookup(byte) {
            INVALID => None,
            code => Some(code),
        }
    }
}

/// Returns the uppercase nucleotide letter for a code.
///
/// Only the low two bits of `code` are considered.
#[inline]
pub const fn nucleotide(code: u8) -> u8 {
    NUCLEOTIDES[(code & 0b11) as usize]
}
