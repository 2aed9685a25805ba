//! Schema validation for arbor document trees.
//!
//! A schema is itself a [`Value`] object whose members are keyword/value
//! rules, in the JSON-Schema dialect: `type`, `const`, `enum`, `required`,
//! `properties`, `patternProperties`, `additionalProperties`, `items`,
//! `minimum`/`maximum`, `allOf`/`anyOf`/`oneOf`/`not`, `if`/`then`/`else`,
//! `$ref` and the rest of the catalogue.
//!
//! [`validate`] walks document and schema together and reports everything it
//! finds through a callback:
//!
//! - [`EventKind::Warning`] — an unknown keyword; evaluation continues.
//! - [`EventKind::Invalid`] — the document violates a rule; evaluation
//!   continues collecting further violations.
//! - [`EventKind::Error`] — the schema itself is malformed; evaluation
//!   stops.
//!
//! The callback returns `false` to abort early. `validate` returns `true`
//! only if nothing invalid or erroneous was reported and the callback never
//! aborted.
//!
//! ```
//! use arbor_core::Value;
//! use arbor_parser::parse;
//! use arbor_schema::{validate, Registry};
//!
//! let schema = parse(r#"{"type":"integer","minimum":0}"#).unwrap();
//! let registry = Registry::new();
//!
//! assert!(validate(&Value::integer(3.0), &schema, &registry, |_| true));
//! assert!(!validate(&Value::integer(-1.0), &schema, &registry, |event| {
//!     eprintln!("{:?} at {:?}: {}", event.kind, event.path, event.keyword);
//!     true
//! }));
//! ```
//!
//! Cross-document references resolve through a [`Registry`] mapping absolute
//! `$id` strings to schema documents; `#` and `#/...` references resolve
//! inside the current document.

mod event;
pub mod format;
mod keyword;
mod registry;
mod validate;

pub use event::{Event, EventKind};
pub use registry::{LoadError, Registry, RegistryError};
pub use validate::{is_valid, validate};
