//! Fuzzing target for applying descriptors
//!
//! The first byte picks a split point; the two halves are parsed as a
//! descriptor and a document. Both engines must return a value or an error
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use reshape_core::{extract, map, structured_map, Extraction, Mapping, Shape, Value};
use serde_json::Value as Json;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let split_point = (data[0] as usize) % data.len();
    let (descriptor_bytes, doc_bytes) = data[1..].split_at(split_point.min(data.len() - 1));

    let Ok(descriptor) = serde_json::from_slice::<Json>(descriptor_bytes) else {
        return;
    };
    let Ok(doc) = serde_json::from_slice::<Json>(doc_bytes) else {
        return;
    };
    let value = Value::from(doc);

    if let Ok(shape) = Shape::from_json(&descriptor) {
        let _ = structured_map(value.clone(), &shape);
    }
    if let Ok(extraction) = Extraction::from_json(&descriptor) {
        let _ = extract(value.clone(), &extraction);
    }

    let _ = map(value, &Mapping::new());
});
