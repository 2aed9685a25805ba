//! Per-keyword shape checks and scalar assertions.
//!
//! [`check`] classifies one rule against the node under evaluation. Simple
//! keywords resolve to `Valid`/`Invalid` here; keywords that need to
//! recurse into sub-schemas resolve to a [`Composite`] handled by the
//! evaluator. A rule whose own value has the wrong shape is an `Error`
//! regardless of the node. An unknown keyword returns `None`.

use crate::format;
use arbor_core::Value;
use regex::Regex;

pub(crate) enum Outcome {
    Valid,
    Invalid,
    Error,
    Composite(Composite),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Composite {
    Ref,
    Not,
    AllOf,
    AnyOf,
    OneOf,
    If,
    ThenOrElse,
    DependentSchemas,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Items,
    Tuples,
    AdditionalItems,
}

fn shape(ok: bool) -> Outcome {
    if ok {
        Outcome::Valid
    } else {
        Outcome::Error
    }
}

fn assertion(ok: bool) -> Outcome {
    if ok {
        Outcome::Valid
    } else {
        Outcome::Invalid
    }
}

fn composite(ok: bool, composite: Composite) -> Outcome {
    if ok {
        Outcome::Composite(composite)
    } else {
        Outcome::Error
    }
}

pub(crate) fn find_sibling<'a>(rules: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    rules
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

pub(crate) fn check(
    name: &str,
    node: Option<&Value>,
    rule: &Value,
    rules: &[(String, Value)],
) -> Option<Outcome> {
    let outcome = match name {
        "$schema" | "$id" | "title" | "description" => shape(rule.is_string()),
        "$defs" => shape(rule.is_object()),
        "default" => Outcome::Valid,
        "examples" => shape(rule.is_array()),
        "readOnly" | "writeOnly" | "deprecated" => shape(rule.is_boolean()),
        "exclusiveMinimum" | "exclusiveMaximum" => shape(rule.is_boolean()),
        "$ref" => composite(rule.is_string(), Composite::Ref),
        "not" => composite(rule.is_object(), Composite::Not),
        "allOf" => composite(rule.is("array of optional objects"), Composite::AllOf),
        "anyOf" => composite(rule.is("array of optional objects"), Composite::AnyOf),
        "oneOf" => composite(rule.is("array of optional objects"), Composite::OneOf),
        "if" => composite(rule.is_object(), Composite::If),
        "then" | "else" => composite(rule.is_object(), Composite::ThenOrElse),
        "type" => type_rule(node, rule),
        "const" => assertion(node.map_or(true, |node| node == rule)),
        "enum" => enum_rule(node, rule),
        "required" => required(node, rule),
        "dependentRequired" => dependent_required(node, rule),
        "dependentSchemas" => composite(
            rule.is("object of optional objects"),
            Composite::DependentSchemas,
        ),
        "properties" => composite(rule.is("object of optional objects"), Composite::Properties),
        "patternProperties" => composite(
            rule.is("object of optional objects"),
            Composite::PatternProperties,
        ),
        "additionalProperties" => additional_properties(node, rule, rules),
        "minProperties" => size_bound(node, rule, Value::is_object, |size, bound| size >= bound),
        "maxProperties" => size_bound(node, rule, Value::is_object, |size, bound| size <= bound),
        "items" => items(node, rule),
        "additionalItems" => additional_items(node, rule, rules),
        "minItems" => size_bound(node, rule, Value::is_array, |size, bound| size >= bound),
        "maxItems" => size_bound(node, rule, Value::is_array, |size, bound| size <= bound),
        "uniqueItems" => unique_items(node, rule),
        "minLength" => length_bound(node, rule, |length, bound| length >= bound),
        "maxLength" => length_bound(node, rule, |length, bound| length <= bound),
        "format" => format_rule(node, rule),
        "pattern" => pattern_rule(node, rule),
        "minimum" => numeric_bound(node, rule, rules, "exclusiveMinimum", |n, b, strict| {
            if strict {
                n > b
            } else {
                n >= b
            }
        }),
        "maximum" => numeric_bound(node, rule, rules, "exclusiveMaximum", |n, b, strict| {
            if strict {
                n < b
            } else {
                n <= b
            }
        }),
        "multipleOf" => multiple_of(node, rule),
        _ => return None,
    };
    Some(outcome)
}

fn type_bit(name: &str) -> Option<u8> {
    Some(match name {
        "object" => 1,
        "array" => 2,
        "string" => 4,
        "integer" => 8,
        "number" => 16,
        "boolean" => 32,
        "null" => 64,
        _ => return None,
    })
}

fn type_rule(node: Option<&Value>, rule: &Value) -> Outcome {
    let mut mask = 0u8;
    if let Some(name) = rule.as_str() {
        match type_bit(name) {
            Some(bit) => mask |= bit,
            None => return Outcome::Error,
        }
    } else if rule.is("array of optional strings") {
        for child in rule.children() {
            match child.value.as_str().and_then(type_bit) {
                Some(bit) => mask |= bit,
                None => return Outcome::Error,
            }
        }
    } else {
        return Outcome::Error;
    }
    match node {
        None => Outcome::Valid,
        Some(node) => {
            let bit = match node.kind() {
                arbor_core::Kind::Object => 1,
                arbor_core::Kind::Array => 2,
                arbor_core::Kind::String => 4,
                arbor_core::Kind::Integer => 8,
                // "number" admits reals and integers alike.
                arbor_core::Kind::Real => 16,
                arbor_core::Kind::Boolean => 32,
                arbor_core::Kind::Null => 64,
            };
            assertion(mask & bit != 0 || (mask & 16 != 0 && node.is_integer()))
        }
    }
}

fn enum_rule(node: Option<&Value>, rule: &Value) -> Outcome {
    if !rule.is_array() {
        return Outcome::Error;
    }
    assertion(node.map_or(true, |node| rule.locate(node).is_some()))
}

fn keys_all_present(node: &Value, keys: &Value) -> bool {
    keys.children()
        .all(|key| key.value.as_str().map_or(false, |key| node.has(key)))
}

fn required(node: Option<&Value>, rule: &Value) -> Outcome {
    if !rule.is("array of optional strings") {
        return Outcome::Error;
    }
    match node {
        Some(node) if node.is_object() => assertion(keys_all_present(node, rule)),
        _ => Outcome::Valid,
    }
}

fn dependent_required(node: Option<&Value>, rule: &Value) -> Outcome {
    let Some(members) = rule.members() else {
        return Outcome::Error;
    };
    let mut valid = true;
    for (key, keys) in members {
        if !keys.is("array of optional strings") {
            return Outcome::Error;
        }
        if valid {
            if let Some(node) = node.filter(|node| node.is_object()) {
                if node.has(key) && !keys_all_present(node, keys) {
                    valid = false;
                }
            }
        }
    }
    assertion(valid)
}

fn additional_properties(node: Option<&Value>, rule: &Value, rules: &[(String, Value)]) -> Outcome {
    if rule.is_object() {
        return Outcome::Composite(Composite::AdditionalProperties);
    }
    let Some(allowed) = rule.as_bool() else {
        return Outcome::Error;
    };
    if allowed {
        return Outcome::Valid;
    }
    let Some(node) = node.filter(|node| node.is_object()) else {
        return Outcome::Valid;
    };
    let Some(properties) =
        find_sibling(rules, "properties").filter(|p| p.is("object of optional objects"))
    else {
        return Outcome::Valid;
    };
    assertion(
        node.children()
            .all(|child| child.key.map_or(false, |key| properties.has(key))),
    )
}

fn size_bound(
    node: Option<&Value>,
    rule: &Value,
    applies: fn(&Value) -> bool,
    test: fn(f64, f64) -> bool,
) -> Outcome {
    if !rule.is_unsigned() {
        return Outcome::Error;
    }
    let bound = rule.as_number().unwrap_or(0.0);
    match node {
        Some(node) if applies(node) => assertion(test(node.size() as f64, bound)),
        _ => Outcome::Valid,
    }
}

fn items(node: Option<&Value>, rule: &Value) -> Outcome {
    if let Some(allowed) = rule.as_bool() {
        return match node {
            Some(node) if node.is_array() => assertion(allowed || node.size() == 0),
            _ => Outcome::Valid,
        };
    }
    if rule.is_object() {
        return Outcome::Composite(Composite::Items);
    }
    if rule.is("array of optional objects") {
        return Outcome::Composite(Composite::Tuples);
    }
    Outcome::Error
}

fn additional_items(node: Option<&Value>, rule: &Value, rules: &[(String, Value)]) -> Outcome {
    if rule.is_object() {
        return Outcome::Composite(Composite::AdditionalItems);
    }
    let Some(allowed) = rule.as_bool() else {
        return Outcome::Error;
    };
    if allowed {
        return Outcome::Valid;
    }
    let Some(node) = node.filter(|node| node.is_array()) else {
        return Outcome::Valid;
    };
    let Some(tuple) =
        find_sibling(rules, "items").filter(|items| items.is("array of optional objects"))
    else {
        return Outcome::Valid;
    };
    assertion(node.size() <= tuple.size())
}

fn unique_items(node: Option<&Value>, rule: &Value) -> Outcome {
    if !rule.is_boolean() {
        return Outcome::Error;
    }
    match node {
        Some(node) if rule.is_true() && node.is_array() => {
            assertion(node.is("array of unique optional items"))
        }
        _ => Outcome::Valid,
    }
}

fn length_bound(node: Option<&Value>, rule: &Value, test: fn(f64, f64) -> bool) -> Outcome {
    if !rule.is_unsigned() {
        return Outcome::Error;
    }
    let bound = rule.as_number().unwrap_or(0.0);
    match node {
        Some(node) if node.is_string() => assertion(test(node.char_len() as f64, bound)),
        _ => Outcome::Valid,
    }
}

fn format_rule(node: Option<&Value>, rule: &Value) -> Outcome {
    let Some(name) = rule.as_str() else {
        return Outcome::Error;
    };
    match node.and_then(Value::as_str) {
        // An unrecognised format name accepts nothing.
        Some(text) => assertion(format::by_name(name).map_or(false, |test| test(text))),
        None => Outcome::Valid,
    }
}

fn pattern_rule(node: Option<&Value>, rule: &Value) -> Outcome {
    let Some(pattern) = rule.as_str() else {
        return Outcome::Error;
    };
    let Ok(regex) = Regex::new(pattern) else {
        return Outcome::Error;
    };
    match node.and_then(Value::as_str) {
        Some(text) => assertion(regex.is_match(text)),
        None => Outcome::Valid,
    }
}

fn numeric_bound(
    node: Option<&Value>,
    rule: &Value,
    rules: &[(String, Value)],
    exclusive_name: &str,
    test: fn(f64, f64, bool) -> bool,
) -> Outcome {
    let Some(bound) = rule.as_number() else {
        return Outcome::Error;
    };
    match node.and_then(Value::as_number) {
        Some(number) => {
            let strict = find_sibling(rules, exclusive_name).map_or(false, Value::is_true);
            assertion(test(number, bound, strict))
        }
        None => Outcome::Valid,
    }
}

fn multiple_of(node: Option<&Value>, rule: &Value) -> Outcome {
    let bound = rule.as_number().unwrap_or(0.0);
    if bound <= 0.0 {
        return Outcome::Error;
    }
    match node.and_then(Value::as_number) {
        Some(number) => assertion(number % bound == 0.0),
        None => Outcome::Valid,
    }
}
