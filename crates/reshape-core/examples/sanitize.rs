// Sanitize an API response with descriptors kept as JSON
// Usage: RUST_LOG=debug cargo run --example sanitize

use reshape_core::{extract, map, structured_map, DataKind, Extraction, Mapping, Shape, Value};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let response = Value::from(json!({
        "user": {
            "id": 42,
            "name": "  Ada Lovelace ",
            "password": "hunter2",
            "created": "1843-07-10T00:00:00Z"
        },
        "roles": [
            {"role": "admin", "granted": "2020-01-01T00:00:00Z", "by": 1},
            {"role": "user", "granted": "2019-05-04T00:00:00Z", "by": 7}
        ]
    }));

    // trim every string, and turn RFC 3339 strings into dates
    let cleanup = Mapping::new()
        .custom(
            |value, _, _| {
                value
                    .as_str()
                    .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
            },
            |value, _, _| match value.as_str().map(chrono::DateTime::parse_from_rfc3339) {
                Some(Ok(date)) => Value::from(date.with_timezone(&chrono::Utc)),
                _ => value,
            },
        )
        .on(DataKind::String, |value, _| {
            Value::from(value.as_str().unwrap_or_default().trim())
        });

    let shape = Shape::from_json_str(
        r#"{
            "user": {"flatten": {"id": true, "name": true, "password": false, "created": true}},
            "roles": [{"role": true, "granted": {"map": true, "rename": "since"}}]
        }"#,
    )?;

    let whitelist = Extraction::from_json_str(r#"{"id": true, "name": true, "roles": [{"role": true}]}"#)?;

    let cleaned = map(response, &cleanup);
    let shaped = structured_map(cleaned, &shape)?;
    println!("shaped:    {}", shaped);

    let public = extract(shaped, &whitelist)?;
    println!("public:    {}", public);

    Ok(())
}
