//! Mapping of extracted units to UN/ECE Recommendation 20 codes.
//!
//! Invoices state units the way people write them ("Std", "Stück",
//! "pauschal"). XRechnung needs Rec 20 codes, so the renderers pass every
//! line unit through [`unit_code`].

/// Fallback for units that cannot be mapped: C62 ("one").
pub const DEFAULT_UNIT_CODE: &str = "C62";

/// Rec 20 code for `unit`.
///
/// Known codes pass through (case-insensitively), common German
/// abbreviations are translated and anything else becomes [`DEFAULT_UNIT_CODE`].
pub fn unit_code(unit: &str) -> &'static str {
    let trimmed = unit.trim().trim_end_matches('.');
    if let Some(code) = known_unit_code(&trimmed.to_uppercase()) {
        return code;
    }

    let lower = trimmed.to_lowercase();
    GERMAN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map_or(DEFAULT_UNIT_CODE, |&(_, code)| code)
}

/// The table entry for an exact Rec 20 code.
fn known_unit_code(code: &str) -> Option<&'static str> {
    UNIT_CODES.binary_search(&code).ok().map(|i| UNIT_CODES[i])
}

static GERMAN_ALIASES: &[(&str, &str)] = &[
    ("stk", "H87"),
    ("stck", "H87"),
    ("stück", "H87"),
    ("st", "H87"),
    ("std", "HUR"),
    ("stunde", "HUR"),
    ("stunden", "HUR"),
    ("h", "HUR"),
    ("min", "MIN"),
    ("tag", "DAY"),
    ("tage", "DAY"),
    ("woche", "WEE"),
    ("monat", "MON"),
    ("monate", "MON"),
    ("jahr", "ANN"),
    ("kg", "KGM"),
    ("g", "GRM"),
    ("t", "TNE"),
    ("l", "LTR"),
    ("liter", "LTR"),
    ("m", "MTR"),
    ("meter", "MTR"),
    ("km", "KMT"),
    ("m2", "MTK"),
    ("m²", "MTK"),
    ("qm", "MTK"),
    ("m3", "MTQ"),
    ("m³", "MTQ"),
    ("kwh", "KWH"),
    ("paar", "PR"),
    ("pauschal", "LS"),
    ("psch", "LS"),
    ("pausch", "LS"),
    ("satz", "SET"),
];

/// Sorted for binary search.
static UNIT_CODES: &[&str] = &[
    "ANN", // Year
    "C62", // One
    "DAY", // Day
    "GRM", // Gram
    "H87", // Piece
    "HUR", // Hour
    "KGM", // Kilogram
    "KMT", // Kilometre
    "KWH", // Kilowatt-hour
    "LS",  // Lump sum
    "LTR", // Litre
    "MIN", // Minute
    "MON", // Month
    "MTK", // Square metre
    "MTQ", // Cubic metre
    "MTR", // Metre
    "PR",  // Pair
    "SET", // Set
    "TNE", // Tonne
    "WEE", // Week
    "XPK", // Package
    "XPX", // Pallet
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_abbreviations() {
        assert_eq!(unit_code("Std"), "HUR");
        assert_eq!(unit_code("Stk."), "H87");
        assert_eq!(unit_code("Stück"), "H87");
        assert_eq!(unit_code(" pauschal "), "LS");
        assert_eq!(unit_code("m²"), "MTK");
    }

    #[test]
    fn codes_pass_through() {
        assert_eq!(unit_code("HUR"), "HUR");
        assert_eq!(unit_code("kgm"), "KGM");
        assert_eq!(unit_code("C62"), "C62");
    }

    #[test]
    fn unknown_falls_back() {
        assert_eq!(unit_code("Palette voll"), DEFAULT_UNIT_CODE);
        assert_eq!(unit_code(""), DEFAULT_UNIT_CODE);
        assert_eq!(known_unit_code("PIECE"), None);
        assert_eq!(known_unit_code("hur"), None);
        assert_eq!(known_unit_code("HUR"), Some("HUR"));
    }

    #[test]
    fn list_is_sorted() {
        for window in UNIT_CODES.windows(2) {
            assert!(
                window[0] < window[1],
                "unit codes not sorted: {} >= {}",
                window[0],
                window[1]
            );
        }
    }
}
