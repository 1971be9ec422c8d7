//! Fuzzing target for descriptor loading
//!
//! Arbitrary text must either load as a shape/extraction or fail with an
//! error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use reshape_core::{Extraction, Shape};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Shape::from_json_str(text);
        let _ = Extraction::from_json_str(text);
    }
});
