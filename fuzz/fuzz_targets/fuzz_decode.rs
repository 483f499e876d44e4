//! Fuzz target for the block decode pipeline.
//!
//! Arbitrary input must either decode or fail with an error, and the result
//! must not depend on the block size or thread count.

#![no_main]

use knucleotide::{config::Config, decoder::decode_sequence};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&shape, input)) = data.split_first() else {
        return;
    };
    let block_size = usize::from(shape & 0x1f) + 1;
    let threads = usize::from(shape >> 5) + 1;

    let whole = Config::new().threads(1).unwrap().block_size(input.len().max(1)).unwrap();
    let split = Config::new()
        .threads(threads)
        .unwrap()
        .block_size(block_size)
        .unwrap();

    match (decode_sequence(input, &whole), decode_sequence(input, &split)) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(_), Err(_)) => {}
        (a, b) => panic!("block size changed the outcome: {a:?} vs {b:?}"),
    }
});
