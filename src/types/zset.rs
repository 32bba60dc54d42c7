//! Sorted Set Module
//!
//! Score-ordered value backed by a [`SkipList`]. Each score holds exactly one
//! member: adding under an existing score replaces that member.

use super::skiplist::{Node, SkipList};
use super::Valuer;

#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    list: SkipList,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing skip list, e.g. one built with a custom level bound.
    pub fn with_list(list: SkipList) -> Self {
        Self { list }
    }

    /// Stores `member` under `score`, replacing any member already there.
    ///
    /// # Panics
    /// If `score` is NaN.
    pub fn add(&mut self, score: f64, member: impl Into<String>) {
        self.list.set(score, member);
    }

    pub fn get(&self, score: f64) -> Option<&str> {
        self.list.get(score).map(Node::value)
    }

    /// Removes the member under `score`. Returns false if there was none.
    pub fn remove(&mut self, score: f64) -> bool {
        self.list.remove(score).is_some()
    }

    /// Probes the exact scores `start, start + step, ...` below `end` and
    /// collects the members found, in probe order.
    ///
    /// This is a stepped lookup, not a scan: populated scores between probe
    /// points are skipped. Non-finite bounds, or a step that is not a
    /// positive finite number, yield nothing.
    pub fn get_range(&self, start: f64, end: f64, step: f64) -> Vec<String> {
        if !(start.is_finite() && end.is_finite() && step.is_finite() && step > 0.0) {
            return Vec::new();
        }

        let mut members = Vec::new();
        let mut last = None;
        let probes = (0u64..)
            .map(|i| start + i as f64 * step)
            .take_while(|&score| score < end);
        for score in probes {
            // At large magnitudes consecutive probes can round to one score
            if last == Some(score) {
                continue;
            }
            last = Some(score);
            if let Some(member) = self.get(score) {
                members.push(member.to_string());
            }
        }
        members
    }

    /// `(score, member)` pairs in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> {
        self.list.iter().map(|node| (node.score(), node.value()))
    }
}

impl Valuer for SortedSet {
    fn size(&self) -> u64 {
        self.list.size()
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn type_name(&self) -> &'static str {
        "Zset"
    }
}
