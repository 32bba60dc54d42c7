//! Set value: an unordered set of strings.

use std::collections::HashSet;

use super::Valuer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetValue {
    members: HashSet<String>,
}

impl SetValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `member`, returning false if it was already present.
    pub fn add(&mut self, member: impl Into<String>) -> bool {
        self.members.insert(member.into())
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.contains(member)
    }

    pub fn remove(&mut self, member: &str) -> bool {
        self.members.remove(member)
    }

    /// Members in arbitrary order.
    pub fn members(&self) -> Vec<&str> {
        self.members.iter().map(String::as_str).collect()
    }

    pub fn intersect(&self, other: &SetValue) -> SetValue {
        SetValue {
            members: self.members.intersection(&other.members).cloned().collect(),
        }
    }

    pub fn union(&self, other: &SetValue) -> SetValue {
        SetValue {
            members: self.members.union(&other.members).cloned().collect(),
        }
    }
}

impl Valuer for SetValue {
    fn size(&self) -> u64 {
        self.members.iter().map(|m| m.len() as u64).sum()
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    fn type_name(&self) -> &'static str {
        "Set"
    }
}

impl<S: Into<String>> FromIterator<S> for SetValue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SetValue {
            members: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let set = SetValue::from_iter(["foo", "foo", "bar"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.size(), 6);

        let mut members = set.members();
        members.sort_unstable();
        assert_eq!(members, vec!["bar", "foo"]);
    }

    #[test]
    fn test_add_remove_contains() {
        let mut set = SetValue::new();
        assert!(set.add("a"));
        assert!(!set.add("a"));
        assert!(set.contains("a"));
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_intersect_and_union() {
        let left = SetValue::from_iter(["a", "b", "c"]);
        let right = SetValue::from_iter(["b", "c", "d"]);

        assert_eq!(left.intersect(&right), SetValue::from_iter(["b", "c"]));
        assert_eq!(left.union(&right), SetValue::from_iter(["a", "b", "c", "d"]));
    }
}
