use std::fmt;

use crate::code::Code;
use crate::frequency::{Symbol, SYMBOLS};
use crate::tree::{HuffmanTree, Node};

/// Code word for every symbol that appears in the tree with a nonzero
/// weight; `None` for the others.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodingTable {
    codes: Vec<Option<Code>>,
}

impl EncodingTable {
    /// Walks the tree depth first, recording the root-to-leaf path of every
    /// leaf. Uses an explicit stack so skewed trees cannot overflow it.
    pub fn from_tree(tree: &HuffmanTree) -> EncodingTable {
        let mut codes = vec![None; SYMBOLS];
        let mut stack = vec![(tree.root(), Code::new())];
        while let Some((id, path)) = stack.pop() {
            match *tree.node(id) {
                // padding leaves have no code
                Node::Leaf { weight: 0, .. } => {}
                Node::Leaf { symbol, .. } => codes[symbol as usize] = Some(path),
                Node::Internal { left, right, .. } => {
                    stack.push((right, path.with(true)));
                    stack.push((left, path.with(false)));
                }
            }
        }
        EncodingTable { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Assigned `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as Symbol, code)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for EncodingTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(symbol, code)| (symbol, code.to_string())))
            .finish()
    }
}

impl fmt::Debug for EncodingTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EncodingTable{}", self)
    }
}
