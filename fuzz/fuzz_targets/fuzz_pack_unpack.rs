//! Fuzz target for pack/unpack roundtrip.
//!
//! Tests that packing and unpacking is the identity operation
//! for valid nucleotide literals.

#![no_main]

use knucleotide::kmer::{pack_literal, unpack_to_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(literal) = std::str::from_utf8(data) else {
        return;
    };

    // Anything else must be rejected, never panic
    let Ok((k, key)) = pack_literal(literal) else {
        return;
    };

    let normalized: Vec<u8> = data.iter().map(u8::to_ascii_uppercase).collect();
    assert_eq!(
        unpack_to_bytes(key, k),
        normalized,
        "Pack/unpack roundtrip failed"
    );
});
