#![no_main]

use libfuzzer_sys::fuzz_target;
use rechnung_konverter::core::{BindingDefaults, normalize};
use rechnung_konverter::xrechnung;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    // Anything normalize accepts must render and re-normalize to the same record.
    if let Ok(invoice) = normalize(value, &BindingDefaults::default()) {
        xrechnung::to_ubl_xml(&invoice).expect("UBL rendering failed");
        xrechnung::to_cii_xml(&invoice).expect("CII rendering failed");

        let canonical = serde_json::to_value(&invoice).expect("serialization failed");
        let again = normalize(canonical, &BindingDefaults::default()).expect("canonical record rejected");
        assert_eq!(invoice, again);
    }
});
