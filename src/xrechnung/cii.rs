use chrono::NaiveDate;

use super::units::unit_code;
use super::xml_utils::{XmlResult, XmlWriter, format_decimal, payment_means_code};
use super::{XRECHNUNG_CUSTOMIZATION_ID, XRECHNUNG_PROFILE_ID, cii_ns};
use crate::core::*;

/// Render the canonical record as UN/CEFACT CII, the syntax ZUGFeRD
/// and Factur-X embed.
pub fn to_cii_xml(invoice: &Invoice) -> XmlResult {
    let doc = &invoice.document;
    let totals = &invoice.totals;
    let currency = doc.currency_code.as_str();
    let mut w = XmlWriter::new()?;

    w.start_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", cii_ns::RSM),
            ("xmlns:ram", cii_ns::RAM),
            ("xmlns:qdt", cii_ns::QDT),
            ("xmlns:udt", cii_ns::UDT),
        ],
    )?;

    w.start("rsm:ExchangedDocumentContext")?;
    w.start("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
    w.text("ram:ID", XRECHNUNG_PROFILE_ID)?;
    w.end("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
    w.start("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text("ram:ID", XRECHNUNG_CUSTOMIZATION_ID)?;
    w.end("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end("rsm:ExchangedDocumentContext")?;

    w.start("rsm:ExchangedDocument")?;
    w.text("ram:ID", &doc.number)?;
    w.text("ram:TypeCode", &doc.kind.type_code().to_string())?;
    write_date(&mut w, "ram:IssueDateTime", &doc.issue_date)?;
    for remark in invoice.remarks.iter().flatten() {
        w.start("ram:IncludedNote")?;
        w.text("ram:Content", &remark.text)?;
        w.end("ram:IncludedNote")?;
    }
    w.end("rsm:ExchangedDocument")?;

    w.start("rsm:SupplyChainTradeTransaction")?;

    // Lines precede the header blocks in the CII schema
    for line in &invoice.lines {
        write_line(&mut w, line)?;
    }

    w.start("ram:ApplicableHeaderTradeAgreement")?;
    write_party(&mut w, &invoice.seller, "ram:SellerTradeParty")?;
    write_party(&mut w, &invoice.buyer, "ram:BuyerTradeParty")?;
    w.end("ram:ApplicableHeaderTradeAgreement")?;

    w.start("ram:ApplicableHeaderTradeDelivery")?;
    w.end("ram:ApplicableHeaderTradeDelivery")?;

    w.start("ram:ApplicableHeaderTradeSettlement")?;
    w.text("ram:InvoiceCurrencyCode", currency)?;

    let payment = &invoice.payment;
    w.start("ram:SpecifiedTradeSettlementPaymentMeans")?;
    w.text("ram:TypeCode", payment_means_code(&payment.method))?;
    w.text("ram:Information", &payment.method)?;
    if let Some(iban) = &payment.iban {
        w.start("ram:PayeePartyCreditorFinancialAccount")?;
        w.text("ram:IBANID", iban)?;
        w.end("ram:PayeePartyCreditorFinancialAccount")?;
        if let Some(bic) = &payment.bic {
            w.start("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
            w.text("ram:BICID", bic)?;
            w.end("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
        }
    }
    w.end("ram:SpecifiedTradeSettlementPaymentMeans")?;

    for bd in invoice.vat_breakdown.iter().flatten() {
        w.start("ram:ApplicableTradeTax")?;
        w.text("ram:CalculatedAmount", &format_decimal(bd.tax_amount))?;
        w.text("ram:TypeCode", "VAT")?;
        w.text("ram:BasisAmount", &format_decimal(bd.taxable_amount))?;
        w.text("ram:CategoryCode", bd.category.code())?;
        w.text("ram:RateApplicablePercent", &format_decimal(bd.rate))?;
        w.end("ram:ApplicableTradeTax")?;
    }

    if let Some(due) = &doc.due_date {
        w.start("ram:SpecifiedTradePaymentTerms")?;
        write_date(&mut w, "ram:DueDateDateTime", due)?;
        w.end("ram:SpecifiedTradePaymentTerms")?;
    }

    w.start("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.text("ram:LineTotalAmount", &format_decimal(totals.net_total))?;
    w.text("ram:TaxBasisTotalAmount", &format_decimal(totals.net_total))?;
    w.text_with_attrs(
        "ram:TaxTotalAmount",
        &format_decimal(totals.vat_total),
        &[("currencyID", currency)],
    )?;
    w.text("ram:GrandTotalAmount", &format_decimal(totals.gross_total))?;
    w.text("ram:DuePayableAmount", &format_decimal(totals.amount_due))?;
    w.end("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;

    w.end("ram:ApplicableHeaderTradeSettlement")?;
    w.end("rsm:SupplyChainTradeTransaction")?;
    w.end("rsm:CrossIndustryInvoice")?;

    w.into_string()
}

/// Dates use format 102 (`YYYYMMDD`).
fn write_date(w: &mut XmlWriter, element: &str, date: &NaiveDate) -> Result<(), RechnungError> {
    w.start(element)?;
    w.text_with_attrs(
        "udt:DateTimeString",
        &date.format("%Y%m%d").to_string(),
        &[("format", "102")],
    )?;
    w.end(element)?;
    Ok(())
}

fn write_party(w: &mut XmlWriter, party: &Party, element: &str) -> Result<(), RechnungError> {
    // Schema order: Name, PostalTradeAddress, SpecifiedTaxRegistration
    w.start(element)?;
    w.text("ram:Name", &party.name)?;

    let address = &party.address;
    w.start("ram:PostalTradeAddress")?;
    w.text("ram:PostcodeCode", &address.postal_code)?;
    w.text("ram:LineOne", &address.street)?;
    w.text("ram:CityName", &address.city)?;
    w.text("ram:CountryID", &address.country_code)?;
    w.end("ram:PostalTradeAddress")?;

    for (id, scheme) in [(&party.vat_id, "VA"), (&party.tax_number, "FC")] {
        if let Some(id) = id {
            w.start("ram:SpecifiedTaxRegistration")?;
            w.text_with_attrs("ram:ID", id, &[("schemeID", scheme)])?;
            w.end("ram:SpecifiedTaxRegistration")?;
        }
    }

    w.end(element)?;
    Ok(())
}

fn write_line(w: &mut XmlWriter, line: &LineItem) -> Result<(), RechnungError> {
    w.start("ram:IncludedSupplyChainTradeLineItem")?;

    w.start("ram:AssociatedDocumentLineDocument")?;
    w.text("ram:LineID", &line.position.to_string())?;
    w.end("ram:AssociatedDocumentLineDocument")?;

    w.start("ram:SpecifiedTradeProduct")?;
    w.text("ram:Name", &line.description)?;
    w.end("ram:SpecifiedTradeProduct")?;

    w.start("ram:SpecifiedLineTradeAgreement")?;
    w.start("ram:NetPriceProductTradePrice")?;
    w.text("ram:ChargeAmount", &format_decimal(line.unit_price))?;
    w.end("ram:NetPriceProductTradePrice")?;
    w.end("ram:SpecifiedLineTradeAgreement")?;

    w.start("ram:SpecifiedLineTradeDelivery")?;
    w.quantity("ram:BilledQuantity", line.quantity, unit_code(&line.unit))?;
    w.end("ram:SpecifiedLineTradeDelivery")?;

    w.start("ram:SpecifiedLineTradeSettlement")?;
    w.start("ram:ApplicableTradeTax")?;
    w.text("ram:TypeCode", "VAT")?;
    w.text("ram:CategoryCode", line.tax.category.code())?;
    w.text("ram:RateApplicablePercent", &format_decimal(line.tax.rate))?;
    w.end("ram:ApplicableTradeTax")?;
    w.start("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.text("ram:LineTotalAmount", &format_decimal(line.line_amount))?;
    w.end("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end("ram:SpecifiedLineTradeSettlement")?;

    w.end("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}
