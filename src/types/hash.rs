//! Hash value: a string to string mapping.

use std::collections::HashMap;

use super::Valuer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashValue {
    fields: HashMap<String, String>,
}

impl HashValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`, returning the previous value if any.
    pub fn put(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.fields.remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Valuer for HashValue {
    fn size(&self) -> u64 {
        self.fields
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }

    fn len(&self) -> usize {
        self.fields.len()
    }

    fn type_name(&self) -> &'static str {
        "Hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut hash = HashValue::new();
        assert!(hash.put("age", "23").is_none());
        hash.put("gender", "male");

        assert_eq!(hash.get("age"), Some("23"));
        assert_eq!(hash.len(), 2);
        assert_eq!(hash.size(), 3 + 2 + 6 + 4);

        assert_eq!(hash.put("age", "24").as_deref(), Some("23"));
        assert_eq!(hash.remove("age").as_deref(), Some("24"));
        assert!(hash.get("age").is_none());
        assert_eq!(hash.size(), 10);
    }
}
