//! Coverage of the keyword catalogue, one behavior at a time.

use arbor_core::Value;
use arbor_parser::parse;
use arbor_schema::{is_valid, validate, EventKind, Registry};

fn tree(text: &str) -> Value {
    parse(text).unwrap()
}

fn accepts(document: &str, schema: &str) -> bool {
    is_valid(&tree(document), &tree(schema), &Registry::new())
}

/// Whether the schema is reported malformed for this document.
fn errors(document: &str, schema: &str) -> bool {
    let mut saw_error = false;
    validate(
        &tree(document),
        &tree(schema),
        &Registry::new(),
        |event| {
            saw_error |= event.kind == EventKind::Error;
            true
        },
    );
    saw_error
}

#[test]
fn type_single_and_list() {
    assert!(accepts("{}", r#"{"type":"object"}"#));
    assert!(accepts("[]", r#"{"type":"array"}"#));
    assert!(accepts(r#""s""#, r#"{"type":"string"}"#));
    assert!(accepts("1", r#"{"type":"integer"}"#));
    assert!(accepts("1", r#"{"type":"number"}"#));
    assert!(accepts("1.5", r#"{"type":"number"}"#));
    assert!(!accepts("1.5", r#"{"type":"integer"}"#));
    assert!(accepts("true", r#"{"type":"boolean"}"#));
    assert!(accepts("null", r#"{"type":"null"}"#));

    assert!(accepts("1", r#"{"type":["string","integer"]}"#));
    assert!(accepts(r#""s""#, r#"{"type":["string","integer"]}"#));
    assert!(!accepts("null", r#"{"type":["string","integer"]}"#));

    assert!(errors("1", r#"{"type":"float"}"#));
    assert!(errors("1", r#"{"type":5}"#));
    assert!(errors("1", r#"{"type":["integer",5]}"#));
}

#[test]
fn const_and_enum() {
    assert!(accepts(r#"{"a":[1]}"#, r#"{"const":{"a":[1]}}"#));
    assert!(!accepts(r#"{"a":[2]}"#, r#"{"const":{"a":[1]}}"#));
    assert!(!accepts("1.0", r#"{"const":1}"#));

    assert!(accepts(r#""b""#, r#"{"enum":["a","b",3]}"#));
    assert!(accepts("3", r#"{"enum":["a","b",3]}"#));
    assert!(!accepts("4", r#"{"enum":["a","b",3]}"#));
    assert!(errors("1", r#"{"enum":"abc"}"#));
}

#[test]
fn required_members() {
    let schema = r#"{"required":["a","b"]}"#;
    assert!(accepts(r#"{"a":1,"b":2,"c":3}"#, schema));
    assert!(!accepts(r#"{"a":1}"#, schema));
    // Non-objects are out of scope for the keyword.
    assert!(accepts("17", schema));
    assert!(errors("{}", r#"{"required":[1]}"#));
    assert!(errors("{}", r#"{"required":"a"}"#));
}

#[test]
fn dependent_required() {
    let schema = r#"{"dependentRequired":{"card":["number","cvv"]}}"#;
    assert!(accepts(r#"{"card":1,"number":2,"cvv":3}"#, schema));
    assert!(accepts(r#"{"cash":1}"#, schema));
    assert!(!accepts(r#"{"card":1,"number":2}"#, schema));
    assert!(errors("{}", r#"{"dependentRequired":{"card":"number"}}"#));
}

#[test]
fn dependent_schemas() {
    let schema = r#"{"dependentSchemas":{"card":{"required":["cvv"]}}}"#;
    assert!(accepts(r#"{"card":1,"cvv":2}"#, schema));
    assert!(accepts(r#"{"cash":1}"#, schema));
    assert!(!accepts(r#"{"card":1}"#, schema));
    assert!(errors("{}", r#"{"dependentSchemas":{"card":5}}"#));
}

#[test]
fn properties_and_additional_properties() {
    let schema = r#"{
        "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
        "additionalProperties": false
    }"#;
    assert!(accepts(r#"{"name":"ada","age":36}"#, schema));
    assert!(accepts(r#"{"name":"ada"}"#, schema));
    assert!(!accepts(r#"{"name":"ada","extra":1}"#, schema));
    assert!(!accepts(r#"{"name":5}"#, schema));

    let typed_extras = r#"{
        "properties": {"name": {"type": "string"}},
        "additionalProperties": {"type": "integer"}
    }"#;
    assert!(accepts(r#"{"name":"ada","extra":1}"#, typed_extras));
    assert!(!accepts(r#"{"name":"ada","extra":"x"}"#, typed_extras));

    // Without a usable properties sibling there is nothing to reject.
    assert!(accepts(r#"{"extra":1}"#, r#"{"additionalProperties":false}"#));
    assert!(errors("{}", r#"{"additionalProperties":5}"#));
}

#[test]
fn pattern_properties() {
    let schema = r#"{"patternProperties":{"^x-":{"type":"string"}}}"#;
    assert!(accepts(r#"{"x-a":"s","plain":5}"#, schema));
    assert!(!accepts(r#"{"x-a":5}"#, schema));
    assert!(errors("{}", r#"{"patternProperties":{"(":{}}}"#));
}

#[test]
fn property_count_bounds() {
    assert!(accepts(r#"{"a":1,"b":2}"#, r#"{"minProperties":2,"maxProperties":3}"#));
    assert!(!accepts(r#"{"a":1}"#, r#"{"minProperties":2}"#));
    assert!(!accepts(r#"{"a":1,"b":2}"#, r#"{"maxProperties":1}"#));
    assert!(accepts("[1,2,3]", r#"{"maxProperties":1}"#));
    assert!(errors("{}", r#"{"minProperties":-1}"#));
    assert!(errors("{}", r#"{"maxProperties":1.5}"#));
}

#[test]
fn items_forms() {
    // Boolean: false demands emptiness, true is no constraint.
    assert!(accepts("[]", r#"{"items":false}"#));
    assert!(!accepts("[1]", r#"{"items":false}"#));
    assert!(accepts("[]", r#"{"items":true}"#));
    assert!(accepts("[1]", r#"{"items":true}"#));

    // Sub-schema: every element.
    assert!(accepts("[1,2,3]", r#"{"items":{"type":"integer"}}"#));
    assert!(!accepts(r#"[1,"x"]"#, r#"{"items":{"type":"integer"}}"#));

    // Tuple: positional.
    let tuple = r#"{"items":[{"type":"string"},{"type":"integer"}]}"#;
    assert!(accepts(r#"["s",1]"#, tuple));
    assert!(accepts(r#"["s",1,true]"#, tuple));
    assert!(!accepts(r#"[1,"s"]"#, tuple));
    assert!(accepts(r#"["s"]"#, tuple));

    assert!(errors("[]", r#"{"items":5}"#));
}

#[test]
fn additional_items() {
    let schema = r#"{
        "items": [{"type": "string"}],
        "additionalItems": {"type": "integer"}
    }"#;
    assert!(accepts(r#"["s",1,2]"#, schema));
    assert!(!accepts(r#"["s",1,"x"]"#, schema));

    let bounded = r#"{"items":[{"type":"string"}],"additionalItems":false}"#;
    assert!(accepts(r#"["s"]"#, bounded));
    assert!(!accepts(r#"["s",1]"#, bounded));

    // Without a tuple sibling the keyword has no reach.
    assert!(accepts("[1,2]", r#"{"additionalItems":false}"#));
    assert!(errors("[]", r#"{"additionalItems":5}"#));
}

#[test]
fn array_bounds_and_uniqueness() {
    assert!(accepts("[1,2]", r#"{"minItems":1,"maxItems":3}"#));
    assert!(!accepts("[]", r#"{"minItems":1}"#));
    assert!(!accepts("[1,2,3,4]", r#"{"maxItems":3}"#));

    assert!(accepts(r#"[1,"1",1.0]"#, r#"{"uniqueItems":true}"#));
    assert!(!accepts("[1,2,1]", r#"{"uniqueItems":true}"#));
    assert!(accepts("[1,2,1]", r#"{"uniqueItems":false}"#));
    assert!(!accepts(r#"[{"a":1},{"a":1}]"#, r#"{"uniqueItems":true}"#));
    assert!(errors("[]", r#"{"uniqueItems":1}"#));
}

#[test]
fn string_length_counts_code_points() {
    assert!(accepts(r#""café""#, r#"{"minLength":4,"maxLength":4}"#));
    assert!(!accepts(r#""café""#, r#"{"minLength":5}"#));
    assert!(!accepts(r#""café""#, r#"{"maxLength":3}"#));
    assert!(accepts("123", r#"{"minLength":9}"#));
    assert!(errors(r#""s""#, r#"{"minLength":"1"}"#));
}

#[test]
fn pattern_matching() {
    assert!(accepts(r#""arbor-42""#, r#"{"pattern":"^[a-z]+-[0-9]+$"}"#));
    assert!(!accepts(r#""Arbor-42""#, r#"{"pattern":"^[a-z]+-[0-9]+$"}"#));
    // Unanchored by default.
    assert!(accepts(r#""xx42yy""#, r#"{"pattern":"[0-9]+"}"#));
    assert!(accepts("42", r#"{"pattern":"^[a-z]+$"}"#));
    assert!(errors(r#""s""#, r#"{"pattern":"("}"#));
    assert!(errors(r#""s""#, r#"{"pattern":5}"#));
}

#[test]
fn format_dispatch() {
    assert!(accepts(r#""2024-02-29""#, r#"{"format":"date"}"#));
    assert!(!accepts(r#""2023-02-29""#, r#"{"format":"date"}"#));
    assert!(accepts(r#""user@example.com""#, r#"{"format":"email"}"#));
    assert!(accepts(r#""::1""#, r#"{"format":"ipv6"}"#));
    assert!(accepts("5", r#"{"format":"date"}"#));
    // An unknown format name accepts no string.
    assert!(!accepts(r#""anything""#, r#"{"format":"flavour"}"#));
    assert!(errors(r#""s""#, r#"{"format":5}"#));
}

#[test]
fn numeric_bounds() {
    assert!(accepts("5", r#"{"minimum":5,"maximum":5}"#));
    assert!(!accepts("4", r#"{"minimum":5}"#));
    assert!(!accepts("6", r#"{"maximum":5}"#));
    assert!(accepts("5.5", r#"{"minimum":5,"maximum":6}"#));

    assert!(!accepts("5", r#"{"minimum":5,"exclusiveMinimum":true}"#));
    assert!(accepts("5", r#"{"minimum":5,"exclusiveMinimum":false}"#));
    assert!(!accepts("5", r#"{"maximum":5,"exclusiveMaximum":true}"#));
    assert!(accepts(r#""not a number""#, r#"{"minimum":5}"#));

    assert!(errors("5", r#"{"minimum":"5"}"#));
    assert!(errors("5", r#"{"minimum":5,"exclusiveMinimum":1}"#));
}

#[test]
fn multiple_of() {
    assert!(accepts("9", r#"{"multipleOf":3}"#));
    assert!(!accepts("10", r#"{"multipleOf":3}"#));
    assert!(accepts("1.5", r#"{"multipleOf":0.5}"#));
    assert!(accepts(r#""s""#, r#"{"multipleOf":3}"#));
    assert!(errors("9", r#"{"multipleOf":0}"#));
    assert!(errors("9", r#"{"multipleOf":-2}"#));
    assert!(errors("9", r#"{"multipleOf":"3"}"#));
}

#[test]
fn not_all_any_one() {
    assert!(accepts(r#""s""#, r#"{"not":{"type":"integer"}}"#));
    assert!(!accepts("1", r#"{"not":{"type":"integer"}}"#));

    let all = r#"{"allOf":[{"type":"integer"},{"minimum":0}]}"#;
    assert!(accepts("3", all));
    assert!(!accepts("-3", all));
    assert!(!accepts("0.5", all));

    let any = r#"{"anyOf":[{"type":"string"},{"minimum":10}]}"#;
    assert!(accepts(r#""s""#, any));
    assert!(accepts("12", any));
    assert!(!accepts("3", any));

    let one = r#"{"oneOf":[{"type":"integer"},{"minimum":10}]}"#;
    assert!(accepts("3", one));
    assert!(accepts("10.5", one));
    assert!(!accepts("12", one));

    assert!(errors("1", r#"{"allOf":{"type":"integer"}}"#));
    assert!(errors("1", r#"{"anyOf":[1]}"#));
    assert!(errors("1", r#"{"not":[]}"#));
}

#[test]
fn defs_shape() {
    assert!(accepts("1", r#"{"$defs":{}}"#));
    assert!(errors("1", r#"{"$defs":[]}"#));
    assert!(errors("1", r#"{"$id":5}"#));
    assert!(errors("1", r#"{"$ref":5}"#));
}

#[test]
fn nested_object_schema_end_to_end() {
    let schema = r#"{
        "type": "object",
        "required": ["user"],
        "properties": {
            "user": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string", "minLength": 1},
                    "email": {"type": "string", "format": "email"},
                    "roles": {
                        "type": "array",
                        "items": {"type": "string", "pattern": "^[a-z]+$"},
                        "uniqueItems": true
                    }
                }
            }
        }
    }"#;
    assert!(accepts(
        r#"{"user":{"name":"ada","email":"ada@example.com","roles":["admin","dev"]}}"#,
        schema
    ));
    assert!(!accepts(r#"{"user":{"email":"ada@example.com"}}"#, schema));
    assert!(!accepts(
        r#"{"user":{"name":"ada","roles":["admin","admin"]}}"#,
        schema
    ));
    assert!(!accepts(
        r#"{"user":{"name":"ada","email":"not-an-email"}}"#,
        schema
    ));
}
