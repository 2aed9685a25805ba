//! Mutable JSON document trees.
//!
//! The central type is [`Value`], a tagged tree node that owns its children.
//! Object members are `(key, value)` pairs kept in insertion order (duplicate
//! keys are allowed and preserved); array elements are unkeyed. Because
//! children are owned by their container, a subtree always has exactly one
//! parent: attaching moves it in, and the `pop`/`remove` family moves it back
//! out as a new root.
//!
//! ## Building
//!
//! ```
//! use arbor_core::Value;
//!
//! let mut doc = Value::object();
//! doc.push_entry("name", Value::string("arbor")).unwrap();
//! doc.push_entry("tags", Value::array()).unwrap();
//! doc.get_mut("tags").unwrap().push(Value::integer(1.0)).unwrap();
//!
//! assert_eq!(doc.to_string(), r#"{"name":"arbor","tags":[1]}"#);
//! ```
//!
//! ## Serialising
//!
//! [`Value`] implements [`Display`][std::fmt::Display] with compact UTF-8
//! output. The [`serialize`][Value::serialize] method returns a builder with
//! chaining methods for indentation and the ASCII escape mode.
//!
//! ## Navigating
//!
//! RFC 6901 lookup via [`pointer`][Value::pointer], depth-first traversal via
//! [`walk`][Value::walk], and the textual predicate language of
//! [`is`][Value::is] (`"array of optional objects"` and friends).

mod patch;
mod pointer;
mod query;
mod serialize;
mod sort;
mod value;
mod walk;

pub use patch::{patch, unpatch, PatchError};
pub use serialize::{quote, quote_with, Encoding, Serialize};
pub use value::{Children, Kind, NodeRef, StructureError, Value};
