//! Bit-level access to byte streams.
//!
//! Both sides are most significant bit first: the first bit written ends up
//! in bit 7 of the first byte, and that is also the first bit read back.

use std::io::{self, Read, Write};

use crate::code::Code;

/// Packs bits into bytes and writes them to `W`.
///
/// Call [`BitWriter::finish`] once done: it pads the last byte with zeros
/// and flushes. A writer dropped without `finish` still emits its partial
/// byte, but any error doing so is lost.
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    buffer: u8,
    count: u8,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> BitWriter<W> {
        BitWriter {
            inner: Some(inner),
            buffer: 0,
            count: 0,
            written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.buffer = (self.buffer << 1) | bit as u8;
        self.count += 1;
        if self.count == 8 {
            self.emit()?;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bytes handed to the inner writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Pads and writes any pending bits, flushes, and gives back the inner
    /// writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.pad()?;
        let mut inner = self.inner.take().ok_or_else(finished)?;
        inner.flush()?;
        Ok(inner)
    }

    /// Writes any pending bits as one byte, zero filled on the right.
    /// Does nothing on a byte boundary.
    pub fn pad(&mut self) -> io::Result<()> {
        if self.count > 0 {
            self.buffer <<= 8 - self.count;
            self.emit()?;
        }
        Ok(())
    }

    fn emit(&mut self) -> io::Result<()> {
        let byte = self.buffer;
        self.buffer = 0;
        self.count = 0;
        self.inner.as_mut().ok_or_else(finished)?.write_all(&[byte])?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.pad();
        }
    }
}

fn finished() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "bit writer already finished")
}

/// Reads bits one at a time from `R`.
///
/// `R` is read a byte at a time, so wrap unbuffered sources in a
/// [`std::io::BufReader`].
pub struct BitReader<R: Read> {
    bytes: io::Bytes<R>,
    buffer: u8,
    // bits of `buffer` already handed out; 8 means it must be refilled
    consumed: u8,
    read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> BitReader<R> {
        BitReader {
            bytes: inner.bytes(),
            buffer: 0,
            consumed: 8,
            read: 0,
        }
    }

    /// Bytes pulled from the inner reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    /// The next bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.consumed == 8 {
            match self.bytes.next() {
                Some(byte) => self.buffer = byte?,
                None => return Ok(None),
            }
            self.consumed = 0;
            self.read += 1;
        }
        let bit = self.buffer & (0x80 >> self.consumed) != 0;
        self.consumed += 1;
        Ok(Some(bit))
    }
}
