use std::fmt;

use bitvec::prelude::{BitVec, Msb0};

/// Bits of one code word, stored most significant first
pub type Bits = BitVec<u8, Msb0>;

/// A Huffman code word: the root-to-leaf path, `false` for left and `true`
/// for right.
#[derive(Eq, PartialEq, Clone, Default, Hash)]
pub struct Code {
    inner: Bits,
}

impl Code {
    pub fn new() -> Code {
        Code { inner: Bits::new() }
    }

    pub fn push(&mut self, bit: bool) {
        self.inner.push(bit);
    }

    /// Copy of this code with `bit` appended.
    pub fn with(&self, bit: bool) -> Code {
        let mut code = self.clone();
        code.push(bit);
        code
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.inner.iter().by_vals()
    }

    pub fn starts_with(&self, prefix: &Code) -> bool {
        self.inner.starts_with(prefix.inner.as_bitslice())
    }
}

impl From<Bits> for Code {
    fn from(bits: Bits) -> Code {
        Code { inner: bits }
    }
}

impl fmt::Display for Code {
    /// The code as a string of `0`s and `1`s.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}
