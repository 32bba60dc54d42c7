//! List value: an ordered sequence of strings with index access.

use super::Valuer;
use crate::error::{CacheError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListValue {
    items: Vec<String>,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Result<&str> {
        self.items
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// Replaces the element at `index`.
    pub fn set(&mut self, index: usize, item: impl Into<String>) -> Result<()> {
        let err = self.out_of_bounds(index);
        let slot = self.items.get_mut(index).ok_or(err)?;
        *slot = item.into();
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements.
    pub fn remove(&mut self, index: usize) -> Result<String> {
        if index >= self.items.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn all(&self) -> &[String] {
        &self.items
    }

    fn out_of_bounds(&self, index: usize) -> CacheError {
        CacheError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        }
    }
}

impl Valuer for ListValue {
    fn size(&self) -> u64 {
        self.items.iter().map(|s| s.len() as u64).sum()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn type_name(&self) -> &'static str {
        "List"
    }
}

impl<S: Into<String>> From<Vec<S>> for ListValue {
    fn from(items: Vec<S>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}
