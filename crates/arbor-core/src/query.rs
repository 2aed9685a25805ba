//! A terse textual predicate language over nodes.
//!
//! Examples of accepted queries:
//!
//! ```text
//! "integer"
//! "unique integer"
//! "array of integers"
//! "array of unique integers"
//! "array of optional integers"
//! "array of optional unique integers"
//! "unique array of unique optional integers"
//! ```
//!
//! The head kind is singular, child kinds are plural, and `of` separates
//! them. `optional` permits a childless iterable; `unique` before the head
//! requires the node to have no byte-equal sibling, `unique` after `of`
//! requires the children to be pairwise distinct (objects by key, arrays by
//! deep value).

use crate::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTest {
    Any,
    Iterable,
    Scalar,
    Object,
    Array,
    String,
    Integer,
    Unsigned,
    Real,
    Number,
    Boolean,
    Null,
}

impl KindTest {
    fn from_singular(token: &str) -> Option<Self> {
        Some(match token {
            "item" => KindTest::Any,
            "iterable" => KindTest::Iterable,
            "scalar" => KindTest::Scalar,
            "object" => KindTest::Object,
            "array" => KindTest::Array,
            "string" => KindTest::String,
            "integer" => KindTest::Integer,
            "unsigned" => KindTest::Unsigned,
            "real" => KindTest::Real,
            "number" => KindTest::Number,
            "boolean" => KindTest::Boolean,
            "null" => KindTest::Null,
            _ => return None,
        })
    }

    fn from_plural(token: &str) -> Option<Self> {
        Some(match token {
            "items" => KindTest::Any,
            "iterables" => KindTest::Iterable,
            "scalars" => KindTest::Scalar,
            "objects" => KindTest::Object,
            "arrays" => KindTest::Array,
            "strings" => KindTest::String,
            "integers" => KindTest::Integer,
            "unsigneds" => KindTest::Unsigned,
            "reals" => KindTest::Real,
            "numbers" => KindTest::Number,
            "booleans" => KindTest::Boolean,
            "nulls" => KindTest::Null,
            _ => return None,
        })
    }

    fn test(self, value: &Value) -> bool {
        match self {
            KindTest::Any => true,
            KindTest::Iterable => value.is_iterable(),
            KindTest::Scalar => value.is_scalar(),
            KindTest::Object => value.is_object(),
            KindTest::Array => value.is_array(),
            KindTest::String => value.is_string(),
            KindTest::Integer => value.is_integer(),
            KindTest::Unsigned => value.is_unsigned(),
            KindTest::Real => value.is_real(),
            KindTest::Number => value.is_number(),
            KindTest::Boolean => value.is_boolean(),
            KindTest::Null => value.is_null(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ChildRule {
    optional: bool,
    unique: bool,
    kind: KindTest,
}

#[derive(Debug, Clone, Copy)]
struct Query {
    unique: bool,
    head: KindTest,
    childs: Option<ChildRule>,
}

const MAX_TOKENS: usize = 6;

fn parse(text: &str) -> Option<Query> {
    let mut tokens = [""; MAX_TOKENS];
    let mut len = 0;
    for token in text.split_whitespace() {
        if len == MAX_TOKENS {
            return None;
        }
        tokens[len] = token;
        len += 1;
    }
    let mut tokens = &tokens[..len];

    let unique = tokens.first() == Some(&"unique");
    if unique {
        tokens = &tokens[1..];
    }
    let head = KindTest::from_singular(tokens.first()?)?;
    if tokens.len() == 1 {
        return Some(Query {
            unique,
            head,
            childs: None,
        });
    }
    if tokens[1] != "of" || tokens.len() < 3 {
        return None;
    }
    let kind = KindTest::from_plural(tokens[tokens.len() - 1])?;
    let mut optional = false;
    let mut child_unique = false;
    for setting in &tokens[2..tokens.len() - 1] {
        match *setting {
            "optional" if !optional => optional = true,
            "unique" if !child_unique => child_unique = true,
            _ => return None,
        }
    }
    Some(Query {
        unique,
        head,
        childs: Some(ChildRule {
            optional,
            unique: child_unique,
            kind,
        }),
    })
}

fn childs_are_unique(node: &Value, kind: KindTest) -> bool {
    match node {
        Value::Object(members) => members.iter().enumerate().all(|(index, (key, value))| {
            kind.test(value) && members[..index].iter().all(|(other, _)| other != key)
        }),
        Value::Array(elements) => elements.iter().enumerate().all(|(index, value)| {
            kind.test(value) && elements[..index].iter().all(|other| other != value)
        }),
        _ => false,
    }
}

fn run(query: &Query, value: &Value, unique_among_siblings: bool) -> bool {
    if !query.head.test(value) {
        return false;
    }
    if query.unique && !unique_among_siblings {
        return false;
    }
    match query.childs {
        None => true,
        Some(rule) => {
            if value.size() > 0 {
                if rule.unique {
                    childs_are_unique(value, rule.kind)
                } else {
                    value.children().all(|child| rule.kind.test(child.value))
                }
            } else {
                rule.optional && value.is_iterable()
            }
        }
    }
}

impl Value {
    /// Evaluate a query string against this node. A malformed query matches
    /// nothing. A leading `unique` is vacuously satisfied here, since a node
    /// evaluated on its own has no siblings; use
    /// [`child_is`][Self::child_is] for the sibling-aware form.
    pub fn is(&self, query: &str) -> bool {
        match parse(query) {
            Some(query) => run(&query, self, true),
            None => false,
        }
    }

    /// Evaluate a query string against the child at `index`, with sibling
    /// context for a leading `unique`.
    pub fn child_is(&self, index: usize, query: &str) -> bool {
        let Some(query) = parse(query) else {
            return false;
        };
        let Some(child) = self.at(index) else {
            return false;
        };
        let unique = !query.unique || self.is_unique_child(index);
        run(&query, child, unique)
    }

    /// Whether the child at `index` has no byte-equal sibling: objects
    /// compare member keys, arrays compare elements by deep equality.
    pub fn is_unique_child(&self, index: usize) -> bool {
        match self {
            Value::Object(members) => match members.get(index) {
                Some((key, _)) => members
                    .iter()
                    .enumerate()
                    .all(|(at, (other, _))| at == index || other != key),
                None => false,
            },
            Value::Array(elements) => match elements.get(index) {
                Some(value) => elements
                    .iter()
                    .enumerate()
                    .all(|(at, other)| at == index || other != value),
                None => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Value;

    fn array_of(values: Vec<Value>) -> Value {
        let mut array = Value::array();
        for value in values {
            array.push(value).unwrap();
        }
        array
    }

    #[test]
    fn plain_kinds() {
        assert!(Value::integer(3.0).is("integer"));
        assert!(Value::integer(3.0).is("number"));
        assert!(Value::integer(3.0).is("unsigned"));
        assert!(!Value::integer(-3.0).is("unsigned"));
        assert!(Value::real(0.5).is("number"));
        assert!(!Value::real(0.5).is("integer"));
        assert!(Value::object().is("iterable"));
        assert!(Value::null().is("scalar"));
        assert!(Value::boolean(true).is("item"));
    }

    #[test]
    fn malformed_queries_match_nothing() {
        assert!(!Value::integer(1.0).is(""));
        assert!(!Value::integer(1.0).is("integers"));
        assert!(!Value::integer(1.0).is("integer of"));
        assert!(!Value::integer(1.0).is("integer integers"));
        assert!(!Value::array().is("array of optional optional items"));
        assert!(!Value::array().is("array of items extra tokens here now"));
    }

    #[test]
    fn of_form_checks_every_child() {
        let ints = array_of(vec![Value::integer(1.0), Value::integer(2.0)]);
        assert!(ints.is("array of integers"));
        assert!(ints.is("array of numbers"));
        assert!(!ints.is("array of strings"));

        let mixed = array_of(vec![Value::integer(1.0), Value::string("x")]);
        assert!(!mixed.is("array of integers"));
        assert!(mixed.is("array of items"));
    }

    #[test]
    fn optional_permits_emptiness() {
        let empty = Value::array();
        assert!(!empty.is("array of integers"));
        assert!(empty.is("array of optional integers"));
        assert!(!Value::integer(1.0).is("integer of optional integers"));
    }

    #[test]
    fn unique_children() {
        let dup = array_of(vec![Value::integer(1.0), Value::integer(1.0)]);
        assert!(dup.is("array of integers"));
        assert!(!dup.is("array of unique integers"));
        assert!(!dup.is("array of unique optional integers"));

        let mut doc = Value::object();
        doc.push_entry("a", Value::integer(1.0)).unwrap();
        doc.push_entry("b", Value::integer(1.0)).unwrap();
        // Object uniqueness is by key, so equal values are fine.
        assert!(doc.is("object of unique integers"));
        doc.push_entry("a", Value::integer(9.0)).unwrap();
        assert!(!doc.is("object of unique integers"));
    }

    #[test]
    fn sibling_uniqueness() {
        let list = array_of(vec![
            Value::integer(1.0),
            Value::integer(2.0),
            Value::integer(1.0),
        ]);
        assert!(list.is_unique_child(1));
        assert!(!list.is_unique_child(0));
        assert!(!list.is_unique_child(2));
        assert!(!list.is_unique_child(9));
        assert!(list.child_is(1, "unique integer"));
        assert!(!list.child_is(0, "unique integer"));
        assert!(list.child_is(0, "integer"));
    }

    #[test]
    fn validator_vocabulary() {
        let mut schemas = Value::array();
        schemas.push(Value::object()).unwrap();
        schemas.push(Value::object()).unwrap();
        assert!(schemas.is("array of optional objects"));

        let mut rules = Value::object();
        rules.push_entry("a", Value::object()).unwrap();
        assert!(rules.is("object of optional objects"));

        let unique_items = array_of(vec![Value::integer(1.0), Value::string("1")]);
        assert!(unique_items.is("array of unique optional items"));
    }
}
