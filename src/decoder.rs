//! Streaming FASTA decoding into a buffer of nucleotide codes.
//!
//! Only the third record of the stream is decoded. The work is split into
//! three stages connected by bounded channels:
//!
//! 1. the **reader** (calling thread) locates the third header, then reads raw
//!    blocks and numbers them in input order;
//! 2. a set of **block decoders** strip line terminators and translate bytes
//!    into codes in place, stopping at the next header marker;
//! 3. a single **collator** appends decoded blocks in block order to the
//!    output buffer, which only it writes to.
//!
//! Block `i` goes to decoder `i % n` over that decoder's own bounded queue,
//! and the collator reads the queues round-robin, so at most a few blocks
//! per decoder are in flight at once. The reader stops after sending the
//! block that holds the next header marker. Closing the raw queues marks the
//! end of input, and the collator only publishes the buffer once drained.
//!
//! # Example
//!
//! ```rust
//! use knucleotide::{config::Config, decoder::decode_sequence};
//!
//! let fasta = b">ONE\nAAAA\n>TWO\nCCCC\n>THREE\nGGTA\ncc\n";
//! let seq = decode_sequence(&fasta[..], &Config::new())?;
//! assert_eq!(seq.to_nucleotides(), "GGTACC");
//! # Ok::<(), knucleotide::error::KnucError>(())
//! ```

use std::{
    io::{ErrorKind, Read},
    thread,
};

use bytes::BytesMut;
use crossbeam_channel::{bounded, Receiver, Sender};

use crate::{
    code::{CODE_TABLE, INVALID},
    config::Config,
    error::{InvalidBaseError, KnucError, Result},
    sequence::Sequence,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

const HEADER_MARKER: u8 = b'>';

/// The record of interest is the one opened by this header marker.
const RECORD_NUMBER: usize = 3;

/// A block of raw input, tagged with its position in the stream.
#[derive(Debug)]
struct RawBlock {
    index: usize,
    /// Stream offset of `data[0]`.
    offset: u64,
    data: BytesMut,
}

/// A block after translation to codes.
#[derive(Debug)]
struct DecodedBlock {
    index: usize,
    codes: std::result::Result<BytesMut, InvalidBaseError>,
    ends_record: bool,
}

/// Reads fixed-size raw blocks from the underlying stream.
struct BlockReader<R> {
    inner: R,
    block_size: usize,
    offset: u64,
    next_index: usize,
}

impl<R: Read> BlockReader<R> {
    const fn new(inner: R, block_size: usize) -> Self {
        Self {
            inner,
            block_size,
            offset: 0,
            next_index: 0,
        }
    }

    /// Returns the next block, or `None` at end of input.
    fn next_block(&mut self) -> Result<Option<RawBlock>> {
        let mut data = BytesMut::zeroed(self.block_size);
        let filled = loop {
            match self.inner.read(&mut data) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(KnucError::Io { source }),
            }
        };
        if filled == 0 {
            return Ok(None);
        }
        data.truncate(filled);
        let block = RawBlock {
            index: self.next_index,
            offset: self.offset,
            data,
        };
        self.next_index += 1;
        self.offset += filled as u64;
        Ok(Some(block))
    }

    /// Skips to the first byte after the third header line.
    ///
    /// Returns what is left of the current block, or `None` if the stream
    /// ends inside the header line.
    fn seek_record(&mut self) -> Result<Option<RawBlock>> {
        let mut markers = 0;
        while let Some(mut block) = self.next_block()? {
            let mut start = 0;
            if markers < RECORD_NUMBER {
                for (i, &byte) in block.data.iter().enumerate() {
                    if byte == HEADER_MARKER {
                        markers += 1;
                        if markers == RECORD_NUMBER {
                            start = i + 1;
                            break;
                        }
                    }
                }
                if markers < RECORD_NUMBER {
                    continue;
                }
            }
            if let Some(eol) = block.data[start..].iter().position(|&b| b == b'\n') {
                let cut = start + eol + 1;
                let rest = block.data.split_off(cut);
                // Renumber so the first block of the record has index 0.
                self.next_index = 1;
                return Ok(Some(RawBlock {
                    index: 0,
                    offset: block.offset + cut as u64,
                    data: rest,
                }));
            }
        }
        if markers < RECORD_NUMBER {
            return Err(KnucError::MissingRecord { found: markers });
        }
        Ok(None)
    }
}

/// Capacity of each per-decoder channel.
const QUEUE_DEPTH: usize = 2;

/// Decodes the third record of a FASTA stream into a [`Sequence`].
///
/// The outcome depends only on the input bytes: a malformed byte that was
/// read before a read failure is reported in preference to that failure,
/// and nothing is read past the block that ends the record.
///
/// # Errors
///
/// - [`KnucError::Io`] if reading fails before the record ends.
/// - [`KnucError::MissingRecord`] if the stream holds fewer than three headers.
/// - [`KnucError::InvalidBase`] if the record contains a byte other than
///   A/C/G/T (any case), `\n` or `\r`.
pub fn decode_sequence<R: Read>(reader: R, config: &Config) -> Result<Sequence> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("decode_sequence", block_size = config.get_block_size()).entered();

    let mut blocks = BlockReader::new(reader, config.get_block_size());
    let Some(first) = blocks.seek_record()? else {
        #[cfg(feature = "tracing")]
        info!("Record is empty");
        return Ok(Sequence::from_decoded(Vec::new()));
    };

    let decoders = config.decoder_threads();
    let (raw_txs, raw_rxs): (Vec<_>, Vec<_>) =
        (0..decoders).map(|_| bounded::<RawBlock>(QUEUE_DEPTH)).unzip();
    let (decoded_txs, decoded_rxs): (Vec<_>, Vec<_>) =
        (0..decoders).map(|_| bounded::<DecodedBlock>(QUEUE_DEPTH)).unzip();

    let (read_result, collated) = thread::scope(|scope| {
        let workers: Vec<_> = raw_rxs
            .into_iter()
            .zip(decoded_txs)
            .map(|(rx, tx)| scope.spawn(move || decode_blocks(&rx, &tx)))
            .collect();
        let collator = scope.spawn(move || collate(decoded_rxs));

        let read_result = feed_blocks(&mut blocks, first, raw_txs);

        let mut panicked = false;
        for worker in workers {
            panicked |= worker.join().is_err();
        }
        let collated = match collator.join() {
            Ok(collated) if !panicked => collated,
            _ => Err(KnucError::Pipeline {
                details: "a decode stage panicked".to_string(),
            }),
        };
        (read_result, collated)
    });

    // Every block the collator saw precedes the failed read.
    let codes = collated?;
    read_result?;

    #[cfg(feature = "tracing")]
    info!(bases = codes.len(), "Decoded sequence");

    Ok(Sequence::from_decoded(codes))
}

/// Reader stage: deals block `i` to decoder `i % n` until end of input or
/// until a block holding the next header marker has been sent.
///
/// Dropping `queues` on return is the end-of-input signal.
fn feed_blocks<R: Read>(
    blocks: &mut BlockReader<R>,
    first: RawBlock,
    queues: Vec<Sender<RawBlock>>,
) -> Result<()> {
    let mut next = Some(first);
    while let Some(block) = next {
        let ends_record = block.data.contains(&HEADER_MARKER);
        if queues[block.index % queues.len()].send(block).is_err() || ends_record {
            break;
        }
        next = blocks.next_block()?;
    }

    #[cfg(feature = "tracing")]
    debug!(blocks = blocks.next_index, bytes = blocks.offset, "Reader finished");

    Ok(())
}

/// Decoder stage: translates blocks until its raw queue closes.
fn decode_blocks(rx: &Receiver<RawBlock>, tx: &Sender<DecodedBlock>) {
    for raw in rx {
        if tx.send(decode_block(raw)).is_err() {
            break;
        }
    }
}

/// Translates one block in place.
fn decode_block(raw: RawBlock) -> DecodedBlock {
    let RawBlock {
        index,
        offset,
        mut data,
    } = raw;
    let mut written = 0;
    let mut ends_record = false;

    for read in 0..data.len() {
        let byte = data[read];
        match byte {
            HEADER_MARKER => {
                ends_record = true;
                break;
            }
            b'\n' | b'\r' => {}
            _ => {
                let code = CODE_TABLE.lookup(byte);
                if code == INVALID {
                    return DecodedBlock {
                        index,
                        codes: Err(InvalidBaseError {
                            base: byte,
                            position: offset + read as u64,
                        }),
                        ends_record: false,
                    };
                }
                data[written] = code;
                written += 1;
            }
        }
    }
    data.truncate(written);

    DecodedBlock {
        index,
        codes: Ok(data),
        ends_record,
    }
}

/// Collator stage: takes block `i` from decoder `i % n`, so blocks arrive
/// in input order and nothing is buffered out of order.
///
/// Owns the receivers so that returning early disconnects the decoders.
fn collate(queues: Vec<Receiver<DecodedBlock>>) -> Result<Vec<u8>> {
    let mut codes = Vec::new();
    let mut next = 0usize;

    while let Ok(block) = queues[next % queues.len()].recv() {
        if block.index != next {
            return Err(KnucError::Pipeline {
                details: format!("expected block {next}, received block {}", block.index),
            });
        }
        next += 1;
        codes.extend_from_slice(&block.codes?);
        if block.ends_record {
            break;
        }
    }

    #[cfg(feature = "tracing")]
    debug!(blocks = next, bases = codes.len(), "Collator drained");

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn decode(input: &[u8], threads: usize, block_size: usize) -> Result<String> {
        let config = Config::new()
            .threads(threads)?
            .block_size(block_size)?;
        decode_sequence(Cursor::new(input.to_vec()), &config).map(|s| s.to_nucleotides())
    }

    const FASTA: &[u8] = b">ONE first\nNNNN\n>TWO second\nXXXX\n>THREE third\nGGTAT\nttTAA\nCG\n>FOUR\nAAAA\n";

    #[test]
    fn decodes_third_record() {
        assert_eq!(decode(FASTA, 4, 1 << 20).unwrap(), "GGTATTTTAACG");
    }

    #[test]
    fn block_boundaries_do_not_matter() {
        for block_size in 1..=FASTA.len() {
            for threads in [1, 3, 6] {
                assert_eq!(
                    decode(FASTA, threads, block_size).unwrap(),
                    "GGTATTTTAACG",
                    "block_size {block_size} threads {threads}"
                );
            }
        }
    }

    #[test]
    fn fewer_than_three_records_is_malformed() {
        let err = decode(b">ONE\nA\n>TWO\nC\n", 2, 4).unwrap_err();
        assert!(matches!(err, KnucError::MissingRecord { found: 2 }));

        let err = decode(b"", 2, 4).unwrap_err();
        assert!(matches!(err, KnucError::MissingRecord { found: 0 }));
    }

    #[test]
    fn empty_record() {
        assert_eq!(decode(b">A\nA\n>B\nC\n>THREE\n", 2, 3).unwrap(), "");
        assert_eq!(decode(b">A\nA\n>B\nC\n>THREE", 2, 3).unwrap(), "");
        assert_eq!(decode(b">A\nA\n>B\nC\n>THREE\n>FOUR\nACGT\n", 2, 3).unwrap(), "");
    }

    #[test]
    fn crlf_line_endings() {
        let input = b">A\r\nA\r\n>B\r\nC\r\n>C\r\nAC\r\nGT\r\n";
        assert_eq!(decode(input, 2, 5).unwrap(), "ACGT");
    }

    #[test]
    fn invalid_base_reports_stream_offset() {
        let input = b">A\n>B\n>C\nACNGT\n";
        let err = decode(input, 3, 4).unwrap_err();
        assert!(matches!(
            err,
            KnucError::InvalidBase {
                base: b'N',
                position: 11
            }
        ));
    }

    #[test]
    fn bytes_after_record_are_ignored() {
        // The fourth header holds bytes that would be invalid inside a record.
        let mut input = b">A\n>B\n>C\nACGT\n>FOUR Homo sapiens\n".to_vec();
        input.extend(std::iter::repeat(b'N').take(64));
        for block_size in [2, 7, 4096] {
            assert_eq!(decode(&input, 4, block_size).unwrap(), "ACGT");
        }
    }

    /// Serves one scripted chunk per `read` call, then fails.
    struct ScriptedReader {
        chunks: Vec<Vec<u8>>,
        reads: usize,
    }

    impl ScriptedReader {
        fn new(chunks: &[&[u8]]) -> Self {
            Self {
                chunks: chunks.iter().map(|chunk| chunk.to_vec()).collect(),
                reads: 0,
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let chunk = self.chunks.get(self.reads);
            self.reads += 1;
            match chunk {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                None => Err(io::Error::new(ErrorKind::Other, "disk on fire")),
            }
        }
    }

    #[test]
    fn read_error_is_fatal() {
        for threads in [1, 3, 6] {
            let config = Config::new().threads(threads).unwrap();
            let mut reader = ScriptedReader::new(&[b">A\n>B\n>C\nACGT\n", b"GG\n"]);
            let err = decode_sequence(&mut reader, &config).unwrap_err();
            assert!(matches!(err, KnucError::Io { .. }), "threads {threads}");
        }
    }

    #[test]
    fn nothing_is_read_past_the_record_end() {
        for threads in [1, 3, 6] {
            let config = Config::new().threads(threads).unwrap();
            let mut reader = ScriptedReader::new(&[b">A\n>B\n>C\nACGT\n>D\n", b"ACGT"]);
            let seq = decode_sequence(&mut reader, &config).unwrap();
            assert_eq!(seq.to_nucleotides(), "ACGT", "threads {threads}");
            assert_eq!(reader.reads, 1, "threads {threads}");
        }
    }

    #[test]
    fn record_end_in_a_later_block_stops_the_reader() {
        for threads in [1, 3, 6] {
            let config = Config::new().threads(threads).unwrap();
            let mut reader =
                ScriptedReader::new(&[b">A\n>B\n>C\n", b"AC\n", b"GT\n>D", b"NNNN"]);
            let seq = decode_sequence(&mut reader, &config).unwrap();
            assert_eq!(seq.to_nucleotides(), "ACGT", "threads {threads}");
            assert_eq!(reader.reads, 3, "threads {threads}");
        }
    }

    #[test]
    fn invalid_base_takes_precedence_over_later_read_error() {
        for threads in [1, 3, 6] {
            let config = Config::new().threads(threads).unwrap();
            let mut reader = ScriptedReader::new(&[b">A\n>B\n>C\nACNT\n", b"ACGT\n"]);
            let err = decode_sequence(&mut reader, &config).unwrap_err();
            assert!(
                matches!(
                    err,
                    KnucError::InvalidBase {
                        base: b'N',
                        position: 11
                    }
                ),
                "threads {threads}: {err}"
            );
        }
    }

    #[test]
    fn collate_rejects_out_of_order_block() {
        let (tx0, rx0) = bounded(QUEUE_DEPTH);
        let (_tx1, rx1) = bounded::<DecodedBlock>(QUEUE_DEPTH);
        tx0.send(DecodedBlock {
            index: 2,
            codes: Ok(BytesMut::new()),
            ends_record: false,
        })
        .unwrap();
        let err = collate(vec![rx0, rx1]).unwrap_err();
        assert!(matches!(err, KnucError::Pipeline { .. }));
    }

    #[test]
    fn collate_reads_queues_round_robin() {
        let (tx0, rx0) = bounded(QUEUE_DEPTH);
        let (tx1, rx1) = bounded(QUEUE_DEPTH);
        let block = |index: usize, codes: &[u8]| DecodedBlock {
            index,
            codes: Ok(BytesMut::from(codes)),
            ends_record: false,
        };
        tx1.send(block(1, &[1])).unwrap();
        tx1.send(block(3, &[3])).unwrap();
        tx0.send(block(0, &[0])).unwrap();
        tx0.send(block(2, &[2])).unwrap();
        drop((tx0, tx1));
        assert_eq!(collate(vec![rx0, rx1]).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn decode_block_stops_at_marker() {
        let block = decode_block(RawBlock {
            index: 0,
            offset: 0,
            data: BytesMut::from(&b"AC\nG>TT"[..]),
        });
        assert!(block.ends_record);
        assert_eq!(block.codes.unwrap().as_ref(), &[0, 1, 2]);
    }
}
