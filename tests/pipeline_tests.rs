#![cfg(feature = "pipeline")]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rechnung_konverter::core::*;
use rechnung_konverter::pipeline::*;
use serde_json::{Value, json};

/// Stands in for the LLM: records the text it saw and returns a fixed draft.
struct FixedDraft {
    draft: Value,
    seen: Arc<Mutex<Option<String>>>,
}

impl FixedDraft {
    fn new(draft: Value) -> Self {
        Self {
            draft,
            seen: Arc::default(),
        }
    }
}

impl DraftExtractor for FixedDraft {
    fn extract_draft(&self, raw_text: &str) -> Result<Value, PipelineError> {
        *self.seen.lock().unwrap() = Some(raw_text.to_string());
        Ok(self.draft.clone())
    }
}

struct FailingDraft;

impl DraftExtractor for FailingDraft {
    fn extract_draft(&self, _raw_text: &str) -> Result<Value, PipelineError> {
        Err(PipelineError::DraftExtraction("model returned no JSON".into()))
    }
}

fn draft(number: &str) -> Value {
    json!({
        "dokument": {"rechnungsnummer": number, "rechnungsart": "RECHNUNG", "rechnungsdatum": "2024-06-15"},
        "verkaeufer": {"name": "ACME GmbH", "anschrift": {"strasse": "Hauptstr. 1", "plz": "10115", "ort": "Berlin"}},
        "kaeufer": {"name": "Kunde AG", "anschrift": {"strasse": "Ring 2", "plz": "80331", "ort": "München"}},
        "positionen": [{
            "positionsnummer": 1, "beschreibung": "Beratung", "menge": 2, "einheit": "Std",
            "einzelpreis_netto": 9.995, "umsatzsteuer": {"kategorie": "S", "satz": 19}
        }],
        "zahlung": {"zahlungsart": "SEPA"}
    })
}

fn write_input(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn processes_text_file() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "rechnung.txt", "  RECHNUNG RE-7  \n\n  Beratung 2 x 9,995  \n");
    let out = tmp.path().join("out");

    let drafter = FixedDraft::new(draft("RE-7"));
    let seen = Arc::clone(&drafter.seen);
    let pipeline = Pipeline::new().with_draft_extractor(drafter);
    let report = pipeline.process_input_file(&input, &out).unwrap();

    assert_eq!(report.status, ProcessingStatus::Success);
    assert_eq!(report.invoice_number, "RE-7");
    assert!(report.output_directory.ends_with("RE-7"));

    let raw = fs::read_to_string(out.join("_working").join("raw_text.txt")).unwrap();
    assert_eq!(raw, "RECHNUNG RE-7\n\nBeratung 2 x 9,995");
    assert_eq!(seen.lock().unwrap().as_deref(), Some(raw.as_str()));

    let canonical = fs::read_to_string(out.join("RE-7").join("canonical.json")).unwrap();
    let inv = Invoice::from_canonical_json(&canonical).unwrap();
    assert_eq!(inv.totals.gross_total, rust_decimal_macros::dec!(23.79));

    assert!(report.files.contains_key("raw_text"));
    assert!(report.files.contains_key("canonical_json"));
    for path in report.files.values() {
        assert!(path.exists(), "{} missing", path.display());
    }
}

#[cfg(feature = "xrechnung")]
#[test]
fn writes_xml_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "scan.csv", "a;b\n1;2\n");
    let out = tmp.path().join("out");

    let report = Pipeline::new()
        .with_draft_extractor(FixedDraft::new(draft("RE-8")))
        .process_input_file(&input, &out)
        .unwrap();

    let ubl = fs::read_to_string(&report.files["xrechnung_xml"]).unwrap();
    let cii = fs::read_to_string(&report.files["zugferd_xml"]).unwrap();
    assert!(ubl.contains("<cbc:PayableAmount currencyID=\"EUR\">23.79</cbc:PayableAmount>"));
    assert!(cii.contains("<ram:DuePayableAmount>23.79</ram:DuePayableAmount>"));
}

#[test]
fn rejects_unknown_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "rechnung.pdf", "%PDF-1.7");
    let err = Pipeline::new()
        .with_draft_extractor(FixedDraft::new(draft("RE-9")))
        .process_input_file(&input, tmp.path())
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat { ref extension } if extension == "pdf"));
}

#[test]
fn custom_text_extractor_is_used() {
    struct FakePdf;
    impl TextExtractor for FakePdf {
        fn extensions(&self) -> &[&'static str] {
            &["pdf"]
        }
        fn extract(&self, _path: &Path) -> Result<String, PipelineError> {
            Ok("aus dem PDF".into())
        }
    }

    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "RECHNUNG.PDF", "%PDF-1.7");
    let report = Pipeline::new()
        .with_text_extractor(FakePdf)
        .with_draft_extractor(FixedDraft::new(draft("RE-10")))
        .without_renderers()
        .process_input_file(&input, tmp.path())
        .unwrap();
    let raw = fs::read_to_string(&report.files["raw_text"]).unwrap();
    assert_eq!(raw, "aus dem PDF");
    assert_eq!(report.files.len(), 2);
}

#[test]
fn requires_draft_extractor() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "a.txt", "x");
    let err = Pipeline::new()
        .process_input_file(&input, tmp.path())
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoDraftExtractor));
}

#[test]
fn draft_failure_propagates() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "a.txt", "x");
    let err = Pipeline::new()
        .with_draft_extractor(FailingDraft)
        .process_input_file(&input, tmp.path())
        .unwrap_err();
    assert!(matches!(err, PipelineError::DraftExtraction(_)));
}

#[test]
fn rejected_draft_writes_no_invoice_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_input(tmp.path(), "a.txt", "x");
    let mut bad = draft("RE-11");
    bad["positionen"] = json!([]);

    let err = Pipeline::new()
        .with_draft_extractor(FixedDraft::new(bad))
        .process_input_file(&input, tmp.path())
        .unwrap_err();
    match err {
        PipelineError::Normalize(e) => assert_eq!(e.kind(), ErrorKind::BusinessRule),
        other => panic!("expected normalize error, got {other:?}"),
    }
    assert!(!tmp.path().join("RE-11").exists());
}

#[test]
fn unsafe_invoice_number_stays_inside_output_root() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    let inv = normalize(draft("../../etc/passwd"), &BindingDefaults::default()).unwrap();

    let report = Pipeline::new().without_renderers().export(&inv, &out).unwrap();
    assert!(report.output_directory.starts_with(std::path::absolute(&out).unwrap()));
    assert_eq!(report.invoice_number, "../../etc/passwd");
    assert!(out.join(safe_dir_name("../../etc/passwd")).join("canonical.json").exists());
}

#[test]
fn report_serializes_with_german_number_key() {
    let tmp = tempfile::tempdir().unwrap();
    let inv = normalize(draft("RE-12"), &BindingDefaults::default()).unwrap();
    let report = Pipeline::new().without_renderers().export(&inv, tmp.path()).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["rechnungsnummer"], "RE-12");
}
