//! Value Module
//!
//! The capability contract every stored value satisfies and the closed set
//! of value variants a store can hold.

use super::{HashValue, ListValue, SetValue, SortedSet, StringValue};

// == Valuer ==
/// Size and length reporting shared by every value type.
pub trait Valuer {
    /// Byte cost charged against a store's capacity.
    fn size(&self) -> u64;

    /// Element count; the meaning depends on the variant.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type tag, as reported by `TYPE` in Redis.
    fn type_name(&self) -> &'static str;
}

// == Value ==
/// A stored value.
#[derive(Debug, Clone)]
pub enum Value {
    String(StringValue),
    List(ListValue),
    Hash(HashValue),
    Set(SetValue),
    SortedSet(SortedSet),
}

impl Value {
    fn as_valuer(&self) -> &dyn Valuer {
        match self {
            Value::String(v) => v,
            Value::List(v) => v,
            Value::Hash(v) => v,
            Value::Set(v) => v,
            Value::SortedSet(v) => v,
        }
    }

    pub fn as_string(&self) -> Option<&StringValue> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListValue> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&HashValue> {
        match self {
            Value::Hash(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_hash_mut(&mut self) -> Option<&mut HashValue> {
        match self {
            Value::Hash(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            Value::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set_mut(&mut self) -> Option<&mut SetValue> {
        match self {
            Value::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sorted_set(&self) -> Option<&SortedSet> {
        match self {
            Value::SortedSet(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sorted_set_mut(&mut self) -> Option<&mut SortedSet> {
        match self {
            Value::SortedSet(v) => Some(v),
            _ => None,
        }
    }
}

impl Valuer for Value {
    fn size(&self) -> u64 {
        self.as_valuer().size()
    }

    fn len(&self) -> usize {
        self.as_valuer().len()
    }

    fn type_name(&self) -> &'static str {
        self.as_valuer().type_name()
    }
}

impl From<StringValue> for Value {
    fn from(v: StringValue) -> Self {
        Value::String(v)
    }
}

impl From<ListValue> for Value {
    fn from(v: ListValue) -> Self {
        Value::List(v)
    }
}

impl From<HashValue> for Value {
    fn from(v: HashValue) -> Self {
        Value::Hash(v)
    }
}

impl From<SetValue> for Value {
    fn from(v: SetValue) -> Self {
        Value::Set(v)
    }
}

impl From<SortedSet> for Value {
    fn from(v: SortedSet) -> Self {
        Value::SortedSet(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(StringValue::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(StringValue::from(s))
    }
}
