use arbor_core::Value;
use arbor_parser::parse;
use arbor_schema::{is_valid, Registry};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn record_schema() -> Value {
    parse(
        r#"{
        "type": "object",
        "required": ["id", "name"],
        "properties": {
            "id": {"type": "integer", "minimum": 0},
            "name": {"type": "string", "minLength": 1, "maxLength": 64},
            "email": {"type": "string", "format": "email"},
            "tags": {
                "type": "array",
                "items": {"type": "string", "pattern": "^[a-z0-9-]+$"},
                "uniqueItems": true
            }
        },
        "additionalProperties": false
    }"#,
    )
    .unwrap()
}

fn records(count: usize) -> Value {
    let mut list = Value::array();
    for at in 0..count {
        let mut record = Value::object();
        record.push_entry("id", Value::integer(at as f64)).unwrap();
        record
            .push_entry("name", Value::format(format_args!("record {at}")))
            .unwrap();
        record
            .push_entry("email", Value::format(format_args!("user{at}@example.com")))
            .unwrap();
        let mut tags = Value::array();
        tags.push(Value::string("alpha")).unwrap();
        tags.push(Value::format(format_args!("tag-{at}"))).unwrap();
        record.push_entry("tags", tags).unwrap();
        list.push(record).unwrap();
    }
    list
}

fn bench_validation(c: &mut Criterion) {
    let schema = record_schema();
    let registry = Registry::new();
    let documents = records(200);
    c.bench_function("validate 200 records", |b| {
        b.iter(|| {
            for record in black_box(&documents).elements().unwrap() {
                assert!(is_valid(record, &schema, &registry));
            }
        })
    });
}

criterion_group!(benches, bench_validation);
criterion_main!(benches);
