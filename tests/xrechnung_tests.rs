#![cfg(feature = "xrechnung")]

use rechnung_konverter::core::*;
use rechnung_konverter::xrechnung;
use serde_json::json;

fn invoice() -> Invoice {
    let draft = json!({
        "dokument": {
            "rechnungsnummer": "RE-2024-001",
            "rechnungsart": "RECHNUNG",
            "rechnungsdatum": "2024-06-15",
            "faelligkeitsdatum": "2024-07-15"
        },
        "verkaeufer": {
            "name": "ACME GmbH",
            "umsatzsteuer_id": "DE123456789",
            "steuernummer": "30/123/45678",
            "anschrift": {"strasse": "Friedrichstraße 123", "plz": "10115", "ort": "Berlin"}
        },
        "kaeufer": {
            "name": "Kunde AG",
            "anschrift": {"strasse": "Marienplatz 1", "plz": "80331", "ort": "München"}
        },
        "positionen": [
            {"positionsnummer": 1, "beschreibung": "Beratung", "menge": 10, "einheit": "Std",
             "einzelpreis_netto": 150, "umsatzsteuer": {"kategorie": "S", "satz": 19}},
            {"positionsnummer": 2, "beschreibung": "Fachbuch", "menge": 2, "einheit": "Stk",
             "einzelpreis_netto": "24.95", "umsatzsteuer": {"kategorie": "S", "satz": 7}}
        ],
        "zahlung": {"zahlungsart": "SEPA", "iban": "DE89370400440532013000", "bic": "COBADEFFXXX"},
        "bemerkungen": ["Zahlbar innerhalb 30 Tagen"]
    });
    normalize(draft, &BindingDefaults::default()).unwrap()
}

#[test]
fn ubl_invoice() {
    let xml = xrechnung::to_ubl_xml(&invoice()).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<ubl:Invoice"));
    assert!(xml.contains(xrechnung::XRECHNUNG_CUSTOMIZATION_ID));
    assert!(xml.contains("<cbc:ID>RE-2024-001</cbc:ID>"));
    assert!(xml.contains("<cbc:IssueDate>2024-06-15</cbc:IssueDate>"));
    assert!(xml.contains("<cbc:DueDate>2024-07-15</cbc:DueDate>"));
    assert!(xml.contains("<cbc:InvoiceTypeCode>380</cbc:InvoiceTypeCode>"));
    assert!(xml.contains("<cbc:Note>Zahlbar innerhalb 30 Tagen</cbc:Note>"));
    assert!(xml.contains("<cbc:DocumentCurrencyCode>EUR</cbc:DocumentCurrencyCode>"));
    assert!(xml.contains("<cbc:PaymentMeansCode name=\"SEPA\">58</cbc:PaymentMeansCode>"));
    assert!(xml.contains("<cbc:ID>DE89370400440532013000</cbc:ID>"));
    assert!(xml.contains("<cbc:ID>FC</cbc:ID>"));
    assert!(xml.contains("<cbc:IdentificationCode>DE</cbc:IdentificationCode>"));
}

#[test]
fn ubl_amounts() {
    let xml = xrechnung::to_ubl_xml(&invoice()).unwrap();

    // 1500.00 @ 19 % and 49.90 @ 7 %
    assert!(xml.contains("<cbc:TaxAmount currencyID=\"EUR\">288.49</cbc:TaxAmount>"));
    assert!(xml.contains("<cbc:TaxableAmount currencyID=\"EUR\">1500.00</cbc:TaxableAmount>"));
    assert!(xml.contains("<cbc:TaxAmount currencyID=\"EUR\">285.00</cbc:TaxAmount>"));
    assert!(xml.contains("<cbc:TaxAmount currencyID=\"EUR\">3.49</cbc:TaxAmount>"));
    assert!(xml.contains("<cbc:TaxExclusiveAmount currencyID=\"EUR\">1549.90</cbc:TaxExclusiveAmount>"));
    assert!(xml.contains("<cbc:TaxInclusiveAmount currencyID=\"EUR\">1838.39</cbc:TaxInclusiveAmount>"));
    assert!(xml.contains("<cbc:PayableAmount currencyID=\"EUR\">1838.39</cbc:PayableAmount>"));
}

#[test]
fn ubl_lines_use_unit_codes() {
    let xml = xrechnung::to_ubl_xml(&invoice()).unwrap();
    assert!(xml.contains("<cbc:InvoicedQuantity unitCode=\"HUR\">10.00</cbc:InvoicedQuantity>"));
    assert!(xml.contains("<cbc:InvoicedQuantity unitCode=\"H87\">2.00</cbc:InvoicedQuantity>"));
    assert!(xml.contains("<cbc:PriceAmount currencyID=\"EUR\">24.95</cbc:PriceAmount>"));
    assert_eq!(xml.matches("<cac:InvoiceLine>").count(), 2);
}

#[test]
fn ubl_credit_note() {
    let mut inv = invoice();
    inv.document.kind = InvoiceKind::CreditNote;
    let xml = xrechnung::to_ubl_xml(&inv).unwrap();
    assert!(xml.contains("<ubl:CreditNote"));
    assert!(xml.contains("<cbc:CreditNoteTypeCode>381</cbc:CreditNoteTypeCode>"));
    assert!(xml.contains("<cac:CreditNoteLine>"));
    assert!(xml.contains("<cbc:PaymentDueDate>2024-07-15</cbc:PaymentDueDate>"));
    assert!(!xml.contains("<cbc:DueDate>"));
}

#[test]
fn cii_invoice() {
    let xml = xrechnung::to_cii_xml(&invoice()).unwrap();

    assert!(xml.contains("<rsm:CrossIndustryInvoice"));
    assert!(xml.contains("<ram:TypeCode>380</ram:TypeCode>"));
    assert!(xml.contains("<udt:DateTimeString format=\"102\">20240615</udt:DateTimeString>"));
    assert!(xml.contains("<udt:DateTimeString format=\"102\">20240715</udt:DateTimeString>"));
    assert!(xml.contains("<ram:ID schemeID=\"VA\">DE123456789</ram:ID>"));
    assert!(xml.contains("<ram:ID schemeID=\"FC\">30/123/45678</ram:ID>"));
    assert!(xml.contains("<ram:IBANID>DE89370400440532013000</ram:IBANID>"));
    assert!(xml.contains("<ram:BICID>COBADEFFXXX</ram:BICID>"));
    assert!(xml.contains("<ram:BilledQuantity unitCode=\"HUR\">10.00</ram:BilledQuantity>"));
    assert!(xml.contains("<ram:TaxTotalAmount currencyID=\"EUR\">288.49</ram:TaxTotalAmount>"));
    assert!(xml.contains("<ram:GrandTotalAmount>1838.39</ram:GrandTotalAmount>"));
    assert!(xml.contains("<ram:DuePayableAmount>1838.39</ram:DuePayableAmount>"));
}

#[test]
fn cii_lines_precede_header() {
    let xml = xrechnung::to_cii_xml(&invoice()).unwrap();
    let line = xml.find("<ram:IncludedSupplyChainTradeLineItem>").unwrap();
    let agreement = xml.find("<ram:ApplicableHeaderTradeAgreement>").unwrap();
    assert!(line < agreement);
}

#[test]
fn escapes_special_characters() {
    let mut inv = invoice();
    inv.seller.name = "Müller & Söhne <KG>".into();
    let ubl = xrechnung::to_ubl_xml(&inv).unwrap();
    let cii = xrechnung::to_cii_xml(&inv).unwrap();
    assert!(ubl.contains("Müller &amp; Söhne &lt;KG&gt;"));
    assert!(cii.contains("Müller &amp; Söhne &lt;KG&gt;"));
}

#[test]
fn payment_method_codes() {
    assert_eq!(xrechnung::payment_means_code("Lastschrift"), "59");
    assert_eq!(xrechnung::payment_means_code("bar"), "10");
    assert_eq!(xrechnung::payment_means_code("EC-Karte"), "48");
    assert_eq!(xrechnung::payment_means_code("Scheck"), "1");
}
