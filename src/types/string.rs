//! String value: a byte string.

use super::Valuer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringValue(Vec<u8>);

impl StringValue {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Valuer for StringValue {
    fn size(&self) -> u64 {
        self.0.len() as u64
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn type_name(&self) -> &'static str {
        "String"
    }
}

impl From<&str> for StringValue {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for StringValue {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for StringValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_value() {
        let s = StringValue::from("23");
        assert_eq!(s.size(), 2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.as_bytes(), b"23");
        assert_eq!(s.to_string_lossy(), "23");
    }

    #[test]
    fn test_non_utf8_bytes() {
        let s = StringValue::new(vec![0xff, 0x00]);
        assert_eq!(s.size(), 2);
        assert_eq!(s.into_bytes(), vec![0xff, 0x00]);
    }
}
