//! Skip List Module
//!
//! Probabilistically balanced ordered map from an `f64` score to a string
//! payload. Nodes live in an arena and link to each other through integer
//! handles, one forward handle per level.
//!
//! A score identifies a node: setting an existing score replaces its payload
//! instead of adding a sibling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// == Public Constants ==
/// Default number of levels
pub const DEFAULT_MAX_LEVEL: usize = 18;

/// Default level growth probability (1/e)
pub const DEFAULT_PROBABILITY: f64 = 1.0 / std::f64::consts::E;

/// Upper bound for `max_level`
pub const MAX_LEVEL_LIMIT: usize = 64;

/// Bytes charged per forward pointer
const POINTER_WIDTH: u64 = std::mem::size_of::<usize>() as u64;

/// Bytes charged per score
const SCORE_WIDTH: u64 = std::mem::size_of::<f64>() as u64;

// == Node ==
/// Stable handle to a node in a [`SkipList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A score/payload pair linked into the list.
#[derive(Debug, Clone)]
pub struct Node {
    score: f64,
    value: String,
    /// Forward handle per level this node participates in
    next: Vec<Option<usize>>,
}

impl Node {
    /// Returns the ordering key.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the payload.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the node, returning its payload.
    pub fn into_value(self) -> String {
        self.value
    }

    /// Number of levels this node is linked into.
    pub fn height(&self) -> usize {
        self.next.len()
    }

    fn cost(&self) -> u64 {
        self.value.len() as u64 + SCORE_WIDTH + POINTER_WIDTH * self.next.len() as u64
    }
}

// == Skip List ==
/// Ordered `f64 -> String` map with expected O(log n) get, set and remove.
///
/// Not synchronized. A list reached through a stored value is protected by
/// the owning store's lock.
#[derive(Debug, Clone)]
pub struct SkipList {
    /// Head sentinel's forward handles, one per level
    head: Vec<Option<usize>>,
    /// Node arena; `None` marks a free slot
    nodes: Vec<Option<Node>>,
    /// Free slots available for reuse
    free: Vec<usize>,
    max_level: usize,
    length: usize,
    /// Σ node cost, header excluded
    bytes: u64,
    probability: f64,
    /// `prob_table[i] == probability^i`
    prob_table: Vec<f64>,
    rng: StdRng,
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipList {
    // == Constructors ==
    /// Creates a list with [`DEFAULT_MAX_LEVEL`] levels.
    pub fn new() -> Self {
        Self::with_max_level(DEFAULT_MAX_LEVEL)
    }

    /// Creates a list with `max_level` levels.
    ///
    /// # Panics
    /// If `max_level` is not in `1..=64`. There is no usable degraded mode
    /// for an out-of-range level bound.
    pub fn with_max_level(max_level: usize) -> Self {
        Self::build(max_level, StdRng::from_entropy())
    }

    /// Creates a list whose level draws are reproducible from `seed`.
    ///
    /// # Panics
    /// Same as [`SkipList::with_max_level`].
    pub fn with_seed(max_level: usize, seed: u64) -> Self {
        Self::build(max_level, StdRng::seed_from_u64(seed))
    }

    fn build(max_level: usize, rng: StdRng) -> Self {
        assert!(
            (1..=MAX_LEVEL_LIMIT).contains(&max_level),
            "max_level for a SkipList must be a positive integer <= {MAX_LEVEL_LIMIT}, got {max_level}"
        );

        Self {
            head: vec![None; max_level],
            nodes: Vec::new(),
            free: Vec::new(),
            max_level,
            length: 0,
            bytes: 0,
            probability: DEFAULT_PROBABILITY,
            prob_table: probability_table(DEFAULT_PROBABILITY, max_level),
            rng,
        }
    }

    // == Set ==
    /// Inserts `value` under `score`, or replaces the payload if `score`
    /// is already present. Returns the node's handle.
    ///
    /// # Panics
    /// If `score` is NaN; NaN has no position in the ordering.
    pub fn set(&mut self, score: f64, value: impl Into<String>) -> NodeId {
        assert!(!score.is_nan(), "skip list score must not be NaN");
        let value = value.into();
        let prevs = self.predecessors(score);

        if let Some(id) = self.forward(prevs[0], 0) {
            let node = self.node_mut(id);
            if node.score == score {
                let old = std::mem::replace(&mut node.value, value);
                let new_len = node.value.len() as u64;
                self.bytes = self.bytes - old.len() as u64 + new_len;
                return NodeId(id);
            }
        }

        let height = self.random_level();
        let next = (0..height)
            .map(|level| self.forward(prevs[level], level))
            .collect();
        let node = Node { score, value, next };
        self.bytes += node.cost();
        let id = self.alloc(node);

        for (level, prev) in prevs.iter().take(height).enumerate() {
            self.set_forward(*prev, level, Some(id));
        }

        self.length += 1;
        NodeId(id)
    }

    // == Get ==
    /// Finds the node holding `score`.
    pub fn get(&self, score: f64) -> Option<&Node> {
        let mut at = None;
        for level in (0..self.max_level).rev() {
            at = self.advance(at, level, score);
        }

        let candidate = self.forward(at, 0)?;
        let node = self.node(candidate);
        (node.score == score).then_some(node)
    }

    /// Returns true if a node holds `score`.
    pub fn contains(&self, score: f64) -> bool {
        self.get(score).is_some()
    }

    /// Resolves a handle returned by [`SkipList::set`]. Returns `None` once
    /// that node has been removed.
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    // == Remove ==
    /// Unlinks the node holding `score` and returns it.
    pub fn remove(&mut self, score: f64) -> Option<Node> {
        let prevs = self.predecessors(score);
        let id = self.forward(prevs[0], 0)?;
        if self.node(id).score != score {
            return None;
        }

        for level in 0..self.node(id).height() {
            let after = self.node(id).next[level];
            self.set_forward(prevs[level], level, after);
        }

        let node = self.nodes[id].take()?;
        self.free.push(id);
        self.length -= 1;
        self.bytes -= node.cost();
        Some(node)
    }

    // == Traversal ==
    /// Returns the node with the lowest score.
    pub fn front(&self) -> Option<&Node> {
        self.head[0].map(|id| self.node(id))
    }

    /// Returns the node following `node` on the bottom level.
    pub fn next(&self, node: &Node) -> Option<&Node> {
        node.next[0].map(|id| self.node(id))
    }

    /// Iterates nodes in ascending score order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head[0],
        }
    }

    // == Tuning ==
    /// Changes the level growth probability. Existing nodes keep their
    /// height; only later inserts see the new table.
    ///
    /// # Panics
    /// If `probability` is not in `(0, 1]`.
    pub fn set_probability(&mut self, probability: f64) {
        assert!(
            probability > 0.0 && probability <= 1.0,
            "skip list probability must be in (0, 1], got {probability}"
        );
        self.probability = probability;
        self.prob_table = probability_table(probability, self.max_level);
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    // == Accounting ==
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Byte cost: every node's payload, score and forward pointers, plus the
    /// head sentinel's pointers.
    pub fn size(&self) -> u64 {
        POINTER_WIDTH * self.max_level as u64 + self.bytes
    }

    /// Removes every node. Level bound and probability are kept.
    pub fn clear(&mut self) {
        self.head.iter_mut().for_each(|slot| *slot = None);
        self.nodes.clear();
        self.free.clear();
        self.length = 0;
        self.bytes = 0;
    }

    // == Internals ==
    /// Rightmost node with a score below `score` on every level; `None`
    /// stands for the head sentinel.
    fn predecessors(&self, score: f64) -> Vec<Option<usize>> {
        let mut prevs = vec![None; self.max_level];
        let mut at = None;
        for level in (0..self.max_level).rev() {
            at = self.advance(at, level, score);
            prevs[level] = at;
        }
        prevs
    }

    /// Walks right on `level` while the next score is strictly below `score`.
    fn advance(&self, mut at: Option<usize>, level: usize, score: f64) -> Option<usize> {
        while let Some(next) = self.forward(at, level) {
            if self.node(next).score < score {
                at = Some(next);
            } else {
                break;
            }
        }
        at
    }

    fn forward(&self, from: Option<usize>, level: usize) -> Option<usize> {
        match from {
            None => self.head[level],
            Some(id) => self.node(id).next[level],
        }
    }

    fn set_forward(&mut self, from: Option<usize>, level: usize, to: Option<usize>) {
        match from {
            None => self.head[level] = to,
            Some(id) => self.node_mut(id).next[level] = to,
        }
    }

    fn node(&self, id: usize) -> &Node {
        self.nodes[id]
            .as_ref()
            .expect("skip list handle points at a free slot")
    }

    fn node_mut(&mut self, id: usize) -> &mut Node {
        self.nodes[id]
            .as_mut()
            .expect("skip list handle points at a free slot")
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn random_level(&mut self) -> usize {
        let r: f64 = self.rng.gen();
        let mut level = 1;
        while level < self.max_level && r < self.prob_table[level] {
            level += 1;
        }
        level
    }
}

/// Probability that a new node reaches each level, `probability^i`.
fn probability_table(probability: f64, max_level: usize) -> Vec<f64> {
    (0..max_level)
        .map(|i| probability.powi(i as i32))
        .collect()
}

// == Iterator ==
/// Ascending iterator over a [`SkipList`].
pub struct Iter<'a> {
    list: &'a SkipList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?);
        self.cursor = node.next[0];
        Some(node)
    }
}

impl<'a> IntoIterator for &'a SkipList {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
