//! Value Types Module
//!
//! The value variants a store can hold, and the skip list backing sorted sets.

mod hash;
mod list;
pub mod skiplist;
mod set;
mod string;
mod value;
mod zset;

// Re-export public types
pub use hash::HashValue;
pub use list::ListValue;
pub use set::SetValue;
pub use skiplist::SkipList;
pub use string::StringValue;
pub use value::{Valuer, Value};
pub use zset::SortedSet;
