#![no_main]

use libfuzzer_sys::fuzz_target;
use rechnung_konverter::core::{BindingDefaults, normalize};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        // Must not panic. Errors are fine, panics are bugs.
        let _ = normalize(value, &BindingDefaults::default());
    }
});
