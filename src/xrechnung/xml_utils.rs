use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::RechnungError;

pub type XmlResult = Result<String, RechnungError>;

fn xml_io(e: std::io::Error) -> RechnungError {
    RechnungError::Xml(format!("write error: {e}"))
}

/// Indenting element writer over an in-memory buffer.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, RechnungError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> XmlResult {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| RechnungError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start(&mut self, name: &str) -> Result<&mut Self, RechnungError> {
        self.start_with_attrs(name, &[])
    }

    pub fn start_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, RechnungError> {
        let mut elem = BytesStart::new(name);
        for &(k, v) in attrs {
            elem.push_attribute((k, v));
        }
        self.writer.write_event(Event::Start(elem)).map_err(xml_io)?;
        Ok(self)
    }

    pub fn end(&mut self, name: &str) -> Result<&mut Self, RechnungError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text(&mut self, name: &str, text: &str) -> Result<&mut Self, RechnungError> {
        self.text_with_attrs(name, text, &[])
    }

    pub fn text_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, RechnungError> {
        self.start_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end(name)
    }

    /// Write `name` only when `text` is present.
    pub fn opt_text(&mut self, name: &str, text: Option<&str>) -> Result<&mut Self, RechnungError> {
        match text {
            Some(t) => self.text(name, t),
            None => Ok(self),
        }
    }

    /// Decimal amount with a `currencyID` attribute (UBL style).
    pub fn amount(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, RechnungError> {
        self.text_with_attrs(name, &format_decimal(amount), &[("currencyID", currency)])
    }

    /// Quantity with a `unitCode` attribute.
    pub fn quantity(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
    ) -> Result<&mut Self, RechnungError> {
        self.text_with_attrs(name, &format_decimal(qty), &[("unitCode", unit)])
    }
}

/// At least two decimal places, trailing zeros beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    match s.find('.') {
        Some(dot) if s.len() - dot - 1 >= 2 => s,
        Some(dot) => format!("{s}{}", "0".repeat(2 - (s.len() - dot - 1))),
        None => format!("{s}.00"),
    }
}

/// UNTDID 4461 payment means code for a free-text payment method.
pub fn payment_means_code(method: &str) -> &'static str {
    let lower = method.trim().to_lowercase();
    if lower.contains("lastschrift") || lower.contains("direct debit") {
        "59"
    } else if lower.contains("sepa") || lower.contains("überweisung") || lower.contains("ueberweisung") {
        "58"
    } else if lower == "bar" || lower.contains("barzahlung") || lower == "cash" {
        "10"
    } else if lower.contains("karte") || lower.contains("card") {
        "48"
    } else {
        "1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(100)), "100.00");
        assert_eq!(format_decimal(dec!(1500.0)), "1500.00");
        assert_eq!(format_decimal(dec!(49.90)), "49.90");
        assert_eq!(format_decimal(dec!(0.005)), "0.005");
        assert_eq!(format_decimal(dec!(-3.5)), "-3.50");
    }

    #[test]
    fn payment_codes() {
        assert_eq!(payment_means_code("SEPA"), "58");
        assert_eq!(payment_means_code("Überweisung"), "58");
        assert_eq!(payment_means_code("SEPA-Lastschrift"), "59");
        assert_eq!(payment_means_code("Bar"), "10");
        assert_eq!(payment_means_code("Kreditkarte"), "48");
        assert_eq!(payment_means_code("PayPal"), "1");
    }

    #[test]
    fn writes_escaped_text() {
        let mut w = XmlWriter::new().unwrap();
        w.start("root").unwrap();
        w.text("name", "Müller & Söhne").unwrap();
        w.end("root").unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<name>Müller &amp; Söhne</name>"));
    }
}
