//! # huffcode
//!
//! Two-pass Huffman compression of whole files.
//!
//! The encoder counts every byte of its input, builds a Huffman tree from
//! those counts, writes the counts as a header and then re-reads the input,
//! emitting one code per byte followed by the code of the end-of-stream
//! sentinel. The decoder rebuilds the same tree from the header and walks it
//! bit by bit until it reaches the sentinel.
//!
//! ```
//! use std::io::Cursor;
//!
//! let original = b"so much depends upon a red wheel barrow";
//! let mut artifact = Vec::new();
//! huffcode::encode(Cursor::new(&original[..]), &mut artifact)?;
//!
//! let mut restored = Vec::new();
//! huffcode::decode(&artifact[..], &mut restored)?;
//! assert_eq!(restored, original);
//! # Ok::<(), huffcode::HuffmanError>(())
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, info};

pub mod bitio;
pub mod code;
pub mod error;
pub mod frequency;
pub mod table;
pub mod tree;

use bitio::{BitReader, BitWriter};
use frequency::for_each_chunk;
use tree::Node;

pub use code::Code;
pub use error::{HuffmanError, Result};
pub use frequency::{Count, FrequencyTable, Symbol, EOF, HEADER_LEN, SYMBOLS};
pub use table::EncodingTable;
pub use tree::HuffmanTree;

/// Sizes seen by one encode or decode call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Bytes consumed from the input (one pass).
    pub input_bytes: u64,
    /// Bytes written to the output, header included.
    pub output_bytes: u64,
}

impl Stats {
    /// Output size as a fraction of input size.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_bytes as f64 / self.input_bytes as f64
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} bytes in, {} bytes out ({:.1}%)",
            self.input_bytes,
            self.output_bytes,
            self.ratio() * 100.0
        )
    }
}

/// Compresses everything from the current position of `r` to its end.
///
/// `r` is read twice: once to count bytes, then again, after seeking back,
/// to emit their codes.
pub fn encode<R, W>(mut r: R, out: W) -> Result<Stats>
where
    R: BufRead + Seek,
    W: Write,
{
    let start = r.stream_position()?;
    let frequencies = FrequencyTable::from_reader(&mut r)?;
    let tree = HuffmanTree::from_frequencies(&frequencies);
    let table = EncodingTable::from_tree(&tree);
    debug!("frequency table: {}", frequencies);
    debug!("encoding table: {}", table);

    let mut out = BufWriter::new(out);
    let header_len = frequencies.write_header(&mut out)? as u64;

    r.seek(SeekFrom::Start(start))?;
    let mut bits = BitWriter::new(out);
    let mut input_bytes: u64 = 0;
    for_each_chunk(&mut r, |chunk| {
        for &byte in chunk {
            let code = table.get(byte as Symbol).ok_or(HuffmanError::Changed)?;
            bits.write_code(code)?;
        }
        input_bytes += chunk.len() as u64;
        Ok::<_, HuffmanError>(())
    })?;
    if input_bytes + 1 != frequencies.total() {
        return Err(HuffmanError::Changed);
    }

    let eof = table.get(EOF).ok_or(HuffmanError::UnassignedSymbol(EOF))?;
    bits.write_code(eof)?;
    bits.pad()?;
    let payload_len = bits.bytes_written();
    bits.finish()?;

    let stats = Stats {
        input_bytes,
        output_bytes: header_len + payload_len,
    };
    debug!(
        "encoded {} ({} distinct symbols)",
        stats,
        frequencies.distinct()
    );
    Ok(stats)
}

/// Decompresses an artifact written by [`encode`].
pub fn decode<R, W>(mut r: R, out: W) -> Result<Stats>
where
    R: Read,
    W: Write,
{
    let frequencies = FrequencyTable::read_header(&mut r)?;
    decode_payload(&frequencies, r, out)
}

fn decode_payload<R, W>(frequencies: &FrequencyTable, r: R, out: W) -> Result<Stats>
where
    R: Read,
    W: Write,
{
    debug!("frequency table: {}", frequencies);
    let tree = HuffmanTree::from_frequencies(frequencies);
    let mut bits = BitReader::new(BufReader::new(r));
    let mut out = BufWriter::new(out);

    let root = tree.root();
    let mut at = root;
    let mut output_bytes: u64 = 0;
    loop {
        let bit = bits.read_bit()?.ok_or(HuffmanError::Truncated)?;
        at = tree.step(at, bit);
        match *tree.node(at) {
            Node::Internal { .. } => {}
            Node::Leaf { symbol: EOF, .. } => break,
            Node::Leaf { weight: 0, symbol } => {
                return Err(HuffmanError::UnassignedSymbol(symbol))
            }
            Node::Leaf { symbol, .. } => {
                out.write_all(&[symbol as u8])?;
                output_bytes += 1;
                at = root;
            }
        }
    }
    out.flush()?;

    let stats = Stats {
        input_bytes: HEADER_LEN as u64 + bits.bytes_read(),
        output_bytes,
    };
    debug!("decoded {}", stats);
    Ok(stats)
}

/// Compresses the file at `src` into a new file at `dst`.
pub fn encode_file<P, Q>(src: P, dst: Q) -> Result<Stats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (src, dst) = (src.as_ref(), dst.as_ref());
    info!("encoding {} into {}", src.display(), dst.display());
    let input = BufReader::new(File::open(src)?);
    let output = File::create(dst)?;
    encode(input, output)
}

/// Decompresses the artifact at `src` into a new file at `dst`.
///
/// The header is validated before `dst` is created, so a malformed artifact
/// leaves no output behind.
pub fn decode_file<P, Q>(src: P, dst: Q) -> Result<Stats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (src, dst) = (src.as_ref(), dst.as_ref());
    info!("decoding {} into {}", src.display(), dst.display());
    let mut input = File::open(src)?;
    let frequencies = FrequencyTable::read_header(&mut input)?;
    let output = File::create(dst)?;
    decode_payload(&frequencies, input, output)
}
