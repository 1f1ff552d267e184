use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;

use crate::frequency::{Count, FrequencyTable, Symbol};

/// Index of a node inside [`HuffmanTree`]'s arena.
pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf {
        weight: Count,
        symbol: Symbol,
    },
    Internal {
        weight: Count,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> Count {
        match *self {
            Node::Leaf { weight, .. } => weight,
            Node::Internal { weight, .. } => weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A full binary tree defining the prefix code.
///
/// Nodes live in an arena; parents always come after their children, so
/// the structure cannot contain cycles. The root is never a leaf: when the
/// table has a single nonzero symbol (only the sentinel, for an empty
/// input) a zero-weight padding leaf is added next to it so the lone symbol
/// still gets a one-bit code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// The queue is keyed on `(weight, node id)`. Leaves are allocated in
    /// symbol order and merged nodes get increasing ids, so ties are broken
    /// the same way every time the same table is used. The first node popped
    /// becomes the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> HuffmanTree {
        let mut nodes: Vec<Node> = frequencies
            .iter()
            .filter(|&(_, count)| count > 0)
            .map(|(symbol, weight)| Node::Leaf { weight, symbol })
            .collect();

        if let [Node::Leaf { symbol: lone, .. }] = nodes[..] {
            let symbol = if lone == 0 { 1 } else { 0 };
            trace!("single symbol {}, padding with empty leaf {}", lone, symbol);
            nodes.push(Node::Leaf { weight: 0, symbol });
        }

        let mut heap: BinaryHeap<Reverse<(Count, NodeId)>> = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| Reverse((node.weight(), id)))
            .collect();

        let mut root = 0;
        while let Some(Reverse((left_weight, left))) = heap.pop() {
            match heap.pop() {
                Some(Reverse((right_weight, right))) => {
                    let weight = left_weight + right_weight;
                    let id = nodes.len();
                    trace!("merge {} + {} -> {} (weight {})", left, right, id, weight);
                    nodes.push(Node::Internal { weight, left, right });
                    heap.push(Reverse((weight, id)));
                }
                None => root = left,
            }
        }

        HuffmanTree { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes, leaves and internal nodes together.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Weight of the root, which is the sum of all frequencies.
    pub fn weight(&self) -> Count {
        self.nodes[self.root].weight()
    }

    /// `(symbol, weight)` of every leaf, in allocation order.
    pub fn leaves(&self) -> impl Iterator<Item = (Symbol, Count)> + '_ {
        self.nodes.iter().filter_map(|node| match *node {
            Node::Leaf { weight, symbol } => Some((symbol, weight)),
            Node::Internal { .. } => None,
        })
    }

    /// Child reached from `from` by following `bit` (`false` is left).
    /// A leaf has no children and is returned unchanged.
    pub fn step(&self, from: NodeId, bit: bool) -> NodeId {
        match self.nodes[from] {
            Node::Internal { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            Node::Leaf { .. } => from,
        }
    }
}
