use crate::{NodeRef, Value};
use std::cmp::Ordering;

impl Value {
    /// Stable sort of the direct children with the default order: member
    /// key for objects, [`compare`][Self::compare] for arrays. Scalars are
    /// untouched; not recursive.
    pub fn sort(&mut self) {
        match self {
            Value::Object(members) => members.sort_by(|a, b| a.0.cmp(&b.0)),
            Value::Array(elements) => elements.sort_by(|a, b| a.compare(b)),
            _ => {}
        }
    }

    /// Stable sort of the direct children under a caller comparator.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(NodeRef<'_>, NodeRef<'_>) -> Ordering,
    {
        match self {
            Value::Object(members) => members.sort_by(|a, b| {
                compare(
                    NodeRef {
                        key: Some(a.0.as_str()),
                        value: &a.1,
                    },
                    NodeRef {
                        key: Some(b.0.as_str()),
                        value: &b.1,
                    },
                )
            }),
            Value::Array(elements) => elements.sort_by(|a, b| {
                compare(
                    NodeRef {
                        key: None,
                        value: a,
                    },
                    NodeRef {
                        key: None,
                        value: b,
                    },
                )
            }),
            _ => {}
        }
    }

    /// Reverse the child sequence in place.
    pub fn reverse(&mut self) {
        match self {
            Value::Object(members) => members.reverse(),
            Value::Array(elements) => elements.reverse(),
            _ => {}
        }
    }
}
