use super::units::unit_code;
use super::xml_utils::{XmlResult, XmlWriter, format_decimal, payment_means_code};
use super::{XRECHNUNG_CUSTOMIZATION_ID, XRECHNUNG_PROFILE_ID, ubl_ns};
use crate::core::*;

/// Render the canonical record as XRechnung UBL 2.1.
///
/// `GUTSCHRIFT` documents are written as a UBL `CreditNote`.
pub fn to_ubl_xml(invoice: &Invoice) -> XmlResult {
    let doc = &invoice.document;
    let currency = doc.currency_code.as_str();
    let is_credit_note = doc.kind == InvoiceKind::CreditNote;
    let (root_tag, root_ns, type_tag, line_tag, qty_tag) = if is_credit_note {
        (
            "ubl:CreditNote",
            ubl_ns::CREDIT_NOTE,
            "cbc:CreditNoteTypeCode",
            "cac:CreditNoteLine",
            "cbc:CreditedQuantity",
        )
    } else {
        (
            "ubl:Invoice",
            ubl_ns::INVOICE,
            "cbc:InvoiceTypeCode",
            "cac:InvoiceLine",
            "cbc:InvoicedQuantity",
        )
    };

    let mut w = XmlWriter::new()?;
    w.start_with_attrs(
        root_tag,
        &[
            ("xmlns:ubl", root_ns),
            ("xmlns:cac", ubl_ns::CAC),
            ("xmlns:cbc", ubl_ns::CBC),
        ],
    )?;

    // BT-24 / BT-23
    w.text("cbc:CustomizationID", XRECHNUNG_CUSTOMIZATION_ID)?;
    w.text("cbc:ProfileID", XRECHNUNG_PROFILE_ID)?;
    // BT-1, BT-2
    w.text("cbc:ID", &doc.number)?;
    w.text("cbc:IssueDate", &doc.issue_date.to_string())?;
    // BT-9: CreditNote carries the due date in PaymentMeans instead
    if !is_credit_note {
        if let Some(due) = &doc.due_date {
            w.text("cbc:DueDate", &due.to_string())?;
        }
    }
    // BT-3
    w.text(type_tag, &doc.kind.type_code().to_string())?;
    // BT-22
    for remark in invoice.remarks.iter().flatten() {
        w.text("cbc:Note", &remark.text)?;
    }
    // BT-5
    w.text("cbc:DocumentCurrencyCode", currency)?;

    write_party(&mut w, &invoice.seller, "cac:AccountingSupplierParty")?;
    write_party(&mut w, &invoice.buyer, "cac:AccountingCustomerParty")?;

    // BG-16
    let payment = &invoice.payment;
    w.start("cac:PaymentMeans")?;
    w.text_with_attrs(
        "cbc:PaymentMeansCode",
        payment_means_code(&payment.method),
        &[("name", payment.method.as_str())],
    )?;
    if is_credit_note {
        if let Some(due) = &doc.due_date {
            w.text("cbc:PaymentDueDate", &due.to_string())?;
        }
    }
    if let Some(iban) = &payment.iban {
        w.start("cac:PayeeFinancialAccount")?;
        w.text("cbc:ID", iban)?;
        if let Some(bic) = &payment.bic {
            w.start("cac:FinancialInstitutionBranch")?;
            w.text("cbc:ID", bic)?;
            w.end("cac:FinancialInstitutionBranch")?;
        }
        w.end("cac:PayeeFinancialAccount")?;
    }
    w.end("cac:PaymentMeans")?;

    // BG-23
    let totals = &invoice.totals;
    w.start("cac:TaxTotal")?;
    w.amount("cbc:TaxAmount", totals.vat_total, currency)?;
    for breakdown in invoice.vat_breakdown.iter().flatten() {
        w.start("cac:TaxSubtotal")?;
        w.amount("cbc:TaxableAmount", breakdown.taxable_amount, currency)?;
        w.amount("cbc:TaxAmount", breakdown.tax_amount, currency)?;
        write_tax_category(&mut w, "cac:TaxCategory", breakdown.category, breakdown.rate)?;
        w.end("cac:TaxSubtotal")?;
    }
    w.end("cac:TaxTotal")?;

    // BG-22
    w.start("cac:LegalMonetaryTotal")?;
    w.amount("cbc:LineExtensionAmount", totals.net_total, currency)?;
    w.amount("cbc:TaxExclusiveAmount", totals.net_total, currency)?;
    w.amount("cbc:TaxInclusiveAmount", totals.gross_total, currency)?;
    w.amount("cbc:PayableAmount", totals.amount_due, currency)?;
    w.end("cac:LegalMonetaryTotal")?;

    // BG-25
    for line in &invoice.lines {
        w.start(line_tag)?;
        w.text("cbc:ID", &line.position.to_string())?;
        w.quantity(qty_tag, line.quantity, unit_code(&line.unit))?;
        w.amount("cbc:LineExtensionAmount", line.line_amount, currency)?;
        w.start("cac:Item")?;
        w.text("cbc:Name", &line.description)?;
        write_tax_category(&mut w, "cac:ClassifiedTaxCategory", line.tax.category, line.tax.rate)?;
        w.end("cac:Item")?;
        w.start("cac:Price")?;
        w.amount("cbc:PriceAmount", line.unit_price, currency)?;
        w.end("cac:Price")?;
        w.end(line_tag)?;
    }

    w.end(root_tag)?;
    w.into_string()
}

fn write_party(w: &mut XmlWriter, party: &Party, wrapper: &str) -> Result<(), RechnungError> {
    w.start(wrapper)?;
    w.start("cac:Party")?;

    w.start("cac:PartyName")?;
    w.text("cbc:Name", &party.name)?;
    w.end("cac:PartyName")?;

    let address = &party.address;
    w.start("cac:PostalAddress")?;
    w.text("cbc:StreetName", &address.street)?;
    w.text("cbc:CityName", &address.city)?;
    w.text("cbc:PostalZone", &address.postal_code)?;
    w.start("cac:Country")?;
    w.text("cbc:IdentificationCode", &address.country_code)?;
    w.end("cac:Country")?;
    w.end("cac:PostalAddress")?;

    // BT-31 uses the VAT scheme, BT-32 the FC scheme
    for (id, scheme) in [(&party.vat_id, "VAT"), (&party.tax_number, "FC")] {
        if let Some(id) = id {
            w.start("cac:PartyTaxScheme")?;
            w.text("cbc:CompanyID", id)?;
            w.start("cac:TaxScheme")?;
            w.text("cbc:ID", scheme)?;
            w.end("cac:TaxScheme")?;
            w.end("cac:PartyTaxScheme")?;
        }
    }

    w.start("cac:PartyLegalEntity")?;
    w.text("cbc:RegistrationName", &party.name)?;
    w.end("cac:PartyLegalEntity")?;

    w.end("cac:Party")?;
    w.end(wrapper)?;
    Ok(())
}

fn write_tax_category(
    w: &mut XmlWriter,
    element: &str,
    category: TaxCategory,
    rate: rust_decimal::Decimal,
) -> Result<(), RechnungError> {
    w.start(element)?;
    w.text("cbc:ID", category.code())?;
    w.text("cbc:Percent", &format_decimal(rate))?;
    w.start("cac:TaxScheme")?;
    w.text("cbc:ID", "VAT")?;
    w.end("cac:TaxScheme")?;
    w.end(element)?;
    Ok(())
}
