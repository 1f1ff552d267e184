use std::fmt;
use std::io::{self, BufRead, Read, Write};

use crate::error::{HuffmanError, Result};

/// A byte value (0..=255) or the end-of-stream sentinel [`EOF`].
pub type Symbol = u16;

/// type used to store the number of occurrences of a symbol.
/// u64 so that inputs larger than 4GiB still count correctly
pub type Count = u64;

/// Sentinel symbol marking the end of the payload.
pub const EOF: Symbol = 256;

/// Size of the alphabet: every byte value plus [`EOF`].
pub const SYMBOLS: usize = 257;

/// First bytes of every artifact.
pub const MAGIC: &[u8; 4] = b"HUF1";

/// Length in bytes of a serialized header.
pub const HEADER_LEN: usize = MAGIC.len() + SYMBOLS * 8;

/// Occurrence counts for all 257 symbols.
///
/// The [`EOF`] entry is always exactly 1, whatever the input was, so the
/// sentinel is guaranteed a code.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [Count; SYMBOLS],
}

impl FrequencyTable {
    /// Counts every byte of `r` until it is exhausted.
    pub fn from_reader<R: BufRead>(r: &mut R) -> io::Result<FrequencyTable> {
        let mut counts = [0; SYMBOLS];
        for_each_chunk(r, |chunk| {
            for &byte in chunk {
                counts[byte as usize] += 1;
            }
            Ok::<_, io::Error>(())
        })?;
        counts[EOF as usize] = 1;
        Ok(FrequencyTable { counts })
    }

    pub fn from_bytes(bytes: &[u8]) -> FrequencyTable {
        let mut counts = [0; SYMBOLS];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        counts[EOF as usize] = 1;
        FrequencyTable { counts }
    }

    /// Builds a table from explicit counts, rejecting anything whose
    /// sentinel entry is not 1 or whose counts do not sum within a
    /// [`Count`]. Every tree weight is bounded by that sum.
    pub fn from_counts(counts: [Count; SYMBOLS]) -> Result<FrequencyTable> {
        if counts[EOF as usize] != 1 {
            return Err(HuffmanError::Header(format!(
                "end-of-stream count is {}, expected 1",
                counts[EOF as usize]
            )));
        }
        if counts
            .iter()
            .try_fold(0, |sum: Count, &count| sum.checked_add(count))
            .is_none()
        {
            return Err(HuffmanError::Header("counts overflow a 64-bit total".to_string()));
        }
        Ok(FrequencyTable { counts })
    }

    pub fn get(&self, symbol: Symbol) -> Count {
        self.counts[symbol as usize]
    }

    /// Sum of all counts, sentinel included.
    pub fn total(&self) -> Count {
        self.counts.iter().sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// `(symbol, count)` pairs in symbol order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Count)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Writes the header: magic followed by every count as a little endian
    /// u64, in symbol order.
    pub fn write_header<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        w.write_all(MAGIC)?;
        for count in &self.counts {
            w.write_all(&count.to_le_bytes())?;
        }
        Ok(HEADER_LEN)
    }

    /// Reads a header written by [`FrequencyTable::write_header`].
    ///
    /// A short read is reported as a malformed header, not as an I/O error.
    pub fn read_header<R: Read>(r: &mut R) -> Result<FrequencyTable> {
        let mut magic = [0u8; 4];
        read_header_bytes(r, &mut magic)?;
        if &magic != MAGIC {
            return Err(HuffmanError::Header(format!("bad magic {:02x?}", magic)));
        }

        let mut raw = [0u8; SYMBOLS * 8];
        read_header_bytes(r, &mut raw)?;
        let mut counts = [0; SYMBOLS];
        for (count, chunk) in counts.iter_mut().zip(raw.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *count = Count::from_le_bytes(bytes);
        }
        FrequencyTable::from_counts(counts)
    }
}

/// Feeds `f` every chunk `r` yields until it is exhausted.
pub(crate) fn for_each_chunk<R, F, E>(r: &mut R, mut f: F) -> std::result::Result<(), E>
where
    R: BufRead,
    F: FnMut(&[u8]) -> std::result::Result<(), E>,
    E: From<io::Error>,
{
    loop {
        let chunk = match r.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if chunk.is_empty() {
            return Ok(());
        }
        f(chunk)?;
        let len = chunk.len();
        r.consume(len);
    }
}

fn read_header_bytes<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffmanError::Header("header is truncated".to_string()),
        _ => HuffmanError::Io(e),
    })
}

impl fmt::Display for FrequencyTable {
    /// Only the nonzero entries, `{symbol: count, ...}`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().filter(|&(_, count)| count > 0))
            .finish()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FrequencyTable{}", self)
    }
}
