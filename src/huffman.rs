//! Huffman coding over the nucleotide alphabet.
//!
//! The tree is built with the classic greedy merge: the two lightest
//! unconsumed nodes are joined under a new parent until one node remains.
//! Nodes live in an arena and refer to their children by index.
//!
//! # Tie-breaking
//!
//! Candidates are ordered by `(count, label)`. Leaf labels are the base's
//! letter and an internal node's label is `left + "+" + right`, so equal
//! counts resolve lexicographically and the resulting codes are
//! reproducible. The first node taken becomes the left (`0`) child.

use std::collections::{BTreeMap, BinaryHeap, HashMap};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::nucleotide::Nucleotide;

/// Index of a node inside a [`HuffmanTree`].
pub type NodeId = usize;

/// Which branch of its parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    /// Reached with a `0` bit.
    Left,
    /// Reached with a `1` bit.
    Right,
}

/// Leaf or internal node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A single base.
    Leaf(Nucleotide),
    /// A merge of two earlier nodes.
    Internal {
        /// Child on the `0` branch.
        left: NodeId,
        /// Child on the `1` branch.
        right: NodeId,
    },
}

/// A node in the Huffman arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanNode {
    label: String,
    count: u64,
    kind: NodeKind,
    consumed: bool,
    side: Option<Side>,
}

impl HuffmanNode {
    fn leaf(symbol: Nucleotide, count: u64) -> Self {
        Self {
            label: symbol.to_string(),
            count,
            kind: NodeKind::Leaf(symbol),
            consumed: false,
            side: None,
        }
    }

    /// The base letter for leaves, or the composite label for internal nodes.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Frequency of this subtree.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Leaf or internal payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The base held by a leaf.
    pub fn symbol(&self) -> Option<Nucleotide> {
        match self.kind {
            NodeKind::Leaf(symbol) => Some(symbol),
            NodeKind::Internal { .. } => None,
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// True once the node has been merged into a parent.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Branch taken from the parent, `None` for the root and unmerged nodes.
    pub fn side(&self) -> Option<Side> {
        self.side
    }
}

/// One step of the greedy merge, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Merge {
    /// Label of the lighter node, placed on the left.
    pub left: String,
    /// Label of the second node, placed on the right.
    pub right: String,
    /// Label of the new parent.
    pub label: String,
    /// Combined count.
    pub count: u64,
}

/// Tree construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanConfig {
    /// Seed the pool with all four bases, even those that never occur.
    ///
    /// When `false`, absent bases get no code, an empty input yields an
    /// empty tree and a single distinct base is coded as `"0"`.
    pub include_unseen: bool,
}

/// Min-heap entry; ordering is reversed so `BinaryHeap` pops the lightest.
#[derive(Debug, PartialEq, Eq)]
struct Candidate {
    count: u64,
    label: String,
    id: NodeId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| other.label.cmp(&self.label))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Huffman tree over the bases of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: Option<NodeId>,
    merges: Vec<Merge>,
}

impl HuffmanTree {
    /// Build a tree with the default configuration.
    pub fn new(freqs: &FrequencyTable) -> Self {
        Self::with_config(freqs, HuffmanConfig::default())
    }

    /// Build a tree from `freqs`.
    pub fn with_config(freqs: &FrequencyTable, config: HuffmanConfig) -> Self {
        let mut nodes = Vec::new();
        let mut pq = BinaryHeap::new();
        for (symbol, count) in freqs.iter() {
            if count > 0 || config.include_unseen {
                let id = nodes.len();
                nodes.push(HuffmanNode::leaf(symbol, count));
                pq.push(Candidate {
                    count,
                    label: symbol.to_string(),
                    id,
                });
            }
        }

        let mut merges = Vec::new();
        let root = loop {
            let Some(left) = pq.pop() else { break None };
            let Some(right) = pq.pop() else { break Some(left.id) };

            let count = left.count + right.count;
            let label = format!("{}+{}", left.label, right.label);
            debug!(
                "combined {} and {} into {} = {}",
                left.label, right.label, label, count
            );

            for (id, side) in [(left.id, Side::Left), (right.id, Side::Right)] {
                nodes[id].consumed = true;
                nodes[id].side = Some(side);
            }

            let id = nodes.len();
            nodes.push(HuffmanNode {
                label: label.clone(),
                count,
                kind: NodeKind::Internal {
                    left: left.id,
                    right: right.id,
                },
                consumed: false,
                side: None,
            });
            merges.push(Merge {
                left: left.label,
                right: right.label,
                label: label.clone(),
                count,
            });
            pq.push(Candidate { count, label, id });
        };

        Self {
            nodes,
            root,
            merges,
        }
    }

    /// Root node, `None` for an empty tree.
    pub fn root(&self) -> Option<&HuffmanNode> {
        self.root.map(|id| &self.nodes[id])
    }

    /// Arena index of the root.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by arena index.
    pub fn node(&self, id: NodeId) -> Option<&HuffmanNode> {
        self.nodes.get(id)
    }

    /// The whole candidate pool: seeded leaves followed by every merge.
    pub fn nodes(&self) -> &[HuffmanNode] {
        &self.nodes
    }

    /// Merge log in construction order.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// True when no base was seeded.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

/// Bidirectional mapping between bases and their codewords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HuffmanCodeTable {
    codes: BTreeMap<Nucleotide, String>,
    #[serde(skip)]
    reverse: HashMap<String, Nucleotide>,
}

impl HuffmanCodeTable {
    /// Derive codewords from root-to-leaf paths, `0` left and `1` right.
    ///
    /// A tree consisting of a lone leaf assigns it `"0"`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::default();
        if let Some(root) = tree.root_id() {
            table.assign(tree, root, String::new());
        }
        for (symbol, code) in &table.codes {
            debug!("{} = {}", symbol, code);
        }
        table
    }

    fn assign(&mut self, tree: &HuffmanTree, id: NodeId, prefix: String) {
        match tree.nodes[id].kind {
            NodeKind::Leaf(symbol) => {
                let code = if prefix.is_empty() {
                    "0".to_string()
                } else {
                    prefix
                };
                self.reverse.insert(code.clone(), symbol);
                self.codes.insert(symbol, code);
            }
            NodeKind::Internal { left, right } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push('0');
                self.assign(tree, left, left_prefix);

                let mut right_prefix = prefix;
                right_prefix.push('1');
                self.assign(tree, right, right_prefix);
            }
        }
    }

    /// Codeword for `symbol`.
    pub fn code(&self, symbol: Nucleotide) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    /// Base whose codeword is exactly `code`.
    pub fn symbol(&self, code: &str) -> Option<Nucleotide> {
        self.reverse.get(code).copied()
    }

    /// Number of bases with a codeword.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when no base has a codeword.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(base, codeword)` pairs in natural order.
    pub fn iter(&self) -> impl Iterator<Item = (Nucleotide, &str)> + '_ {
        self.codes.iter().map(|(&n, c)| (n, c.as_str()))
    }

    /// True when no codeword is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.codes.values().all(|a| {
            self.codes
                .values()
                .filter(|b| !std::ptr::eq(*b, a))
                .all(|b| !b.starts_with(a.as_str()))
        })
    }
}

/// Concatenate the codewords of `seq`.
///
/// # Errors
/// Returns `Error::MissingCode` for a base the table has no codeword for.
pub fn encode(seq: &[Nucleotide], table: &HuffmanCodeTable) -> Result<String> {
    let mut bits = String::new();
    for &symbol in seq {
        let code = table.code(symbol).ok_or(Error::MissingCode(symbol))?;
        bits.push_str(code);
    }
    Ok(bits)
}

/// Decode a bit-string by greedy codeword matching.
///
/// # Errors
/// Returns `Error::InvalidBit` for characters other than `0`/`1` and
/// `Error::TrailingBits` if the input ends inside a codeword.
pub fn decode(bits: &str, table: &HuffmanCodeTable) -> Result<Vec<Nucleotide>> {
    let mut out = Vec::new();
    let mut pending = String::new();

    for (position, bit) in bits.chars().enumerate() {
        if bit != '0' && bit != '1' {
            return Err(Error::InvalidBit { bit, position });
        }
        pending.push(bit);
        if let Some(symbol) = table.symbol(&pending) {
            trace!("decoded {} to {}", pending, symbol);
            out.push(symbol);
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(Error::TrailingBits(pending));
    }
    Ok(out)
}
