use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// BG-0 Invoice, the canonical and fully validated record.
///
/// Produced only by [`normalize`](super::normalize); renderers receive it by
/// shared reference. Serializes with the same German field names the draft
/// uses, so `canonical.json` can be read back losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "dokument")]
    pub document: DocumentInfo,
    /// BG-4: Seller.
    #[serde(rename = "verkaeufer")]
    pub seller: Party,
    /// BG-7: Buyer.
    #[serde(rename = "kaeufer")]
    pub buyer: Party,
    /// BG-25: Invoice lines, never empty.
    #[serde(rename = "positionen")]
    pub lines: Vec<LineItem>,
    /// BG-23: VAT breakdown. `None` when no line produced a bucket.
    #[serde(rename = "umsatzsteuer_aufschluesselung")]
    pub vat_breakdown: Option<Vec<VatBreakdown>>,
    /// BG-22: Document totals.
    #[serde(rename = "summen")]
    pub totals: Totals,
    /// BG-16: Payment instructions.
    #[serde(rename = "zahlung")]
    pub payment: PaymentInstructions,
    /// BT-22: Free-text remarks.
    #[serde(rename = "bemerkungen")]
    pub remarks: Option<Vec<Remark>>,
}

impl Invoice {
    /// Serialize to the pretty-printed canonical JSON used for audit storage.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read back a record written by [`Invoice::to_canonical_json`].
    pub fn from_canonical_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// BT-1: Invoice number.
    #[serde(rename = "rechnungsnummer")]
    pub number: String,
    /// BT-3: Invoice type.
    #[serde(rename = "rechnungsart")]
    pub kind: InvoiceKind,
    /// BT-2: Issue date.
    #[serde(rename = "rechnungsdatum")]
    pub issue_date: NaiveDate,
    /// BT-9: Payment due date.
    #[serde(rename = "faelligkeitsdatum")]
    pub due_date: Option<NaiveDate>,
    /// BT-5: Currency code (ISO 4217).
    #[serde(rename = "waehrung")]
    pub currency_code: String,
}

/// The invoice types the normalization core accepts.
///
/// Renderers translate these to UNTDID 1001 codes via [`InvoiceKind::type_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceKind {
    /// Standard commercial invoice.
    #[serde(rename = "RECHNUNG")]
    Invoice,
    /// Credit note.
    #[serde(rename = "GUTSCHRIFT")]
    CreditNote,
}

impl InvoiceKind {
    /// Parse the domain label used in drafts.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "RECHNUNG" => Some(Self::Invoice),
            "GUTSCHRIFT" => Some(Self::CreditNote),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Invoice => "RECHNUNG",
            Self::CreditNote => "GUTSCHRIFT",
        }
    }

    /// UNTDID 1001 numeric code.
    pub fn type_code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::CreditNote => 381,
        }
    }
}

/// BG-4 / BG-7: Party (seller or buyer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// BT-27 / BT-44: Name.
    pub name: String,
    /// BT-31 / BT-48: VAT identifier (USt-IdNr.).
    #[serde(rename = "umsatzsteuer_id")]
    pub vat_id: Option<String>,
    /// BT-32: Tax registration number (Steuernummer).
    #[serde(rename = "steuernummer")]
    pub tax_number: Option<String>,
    /// BG-5 / BG-8: Postal address.
    #[serde(rename = "anschrift")]
    pub address: Address,
}

/// BG-5 / BG-8: Postal address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// BT-35 / BT-50: Street + house number.
    #[serde(rename = "strasse")]
    pub street: String,
    /// BT-38 / BT-53: Postal code.
    #[serde(rename = "plz")]
    pub postal_code: String,
    /// BT-37 / BT-52: City.
    #[serde(rename = "ort")]
    pub city: String,
    /// BT-40 / BT-55: Country code (ISO 3166-1 alpha-2).
    #[serde(rename = "land")]
    pub country_code: String,
}

/// BG-25: Invoice line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// BT-126: Line identifier.
    #[serde(rename = "positionsnummer")]
    pub position: u32,
    /// BT-153: Item name / description.
    #[serde(rename = "beschreibung")]
    pub description: String,
    /// BT-129: Invoiced quantity.
    #[serde(rename = "menge")]
    pub quantity: Decimal,
    /// BT-130: Unit of measure as extracted (e.g. "Stk", "HUR").
    #[serde(rename = "einheit")]
    pub unit: String,
    /// BT-146: Item net price.
    #[serde(rename = "einzelpreis_netto")]
    pub unit_price: Decimal,
    /// BT-131: Line net amount, always `round(quantity * unit_price, 2)`.
    #[serde(rename = "positionsbetrag_netto")]
    pub line_amount: Decimal,
    /// BT-151 / BT-152.
    #[serde(rename = "umsatzsteuer")]
    pub tax: LineTax,
}

/// BT-151 / BT-152: Tax category and rate of a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTax {
    #[serde(rename = "kategorie")]
    pub category: TaxCategory,
    /// Rate in percent.
    #[serde(rename = "satz")]
    pub rate: Decimal,
}

/// UNTDID 5305: Tax category codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// S: Standard rate (7% or 19% in Germany).
    #[serde(rename = "S")]
    StandardRate,
    /// Z: Zero rated.
    #[serde(rename = "Z")]
    ZeroRated,
    /// E: Exempt from tax.
    #[serde(rename = "E")]
    Exempt,
    /// AE: Reverse charge.
    #[serde(rename = "AE")]
    ReverseCharge,
    /// K: Intra-community supply.
    #[serde(rename = "K")]
    IntraCommunitySupply,
    /// G: Export (outside EU).
    #[serde(rename = "G")]
    Export,
    /// O: Not subject to VAT.
    #[serde(rename = "O")]
    NotSubjectToVat,
}

impl TaxCategory {
    /// UNTDID 5305 code letter.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardRate => "S",
            Self::ZeroRated => "Z",
            Self::Exempt => "E",
            Self::ReverseCharge => "AE",
            Self::IntraCommunitySupply => "K",
            Self::Export => "G",
            Self::NotSubjectToVat => "O",
        }
    }

    /// Parse from UNTDID 5305 code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::StandardRate),
            "Z" => Some(Self::ZeroRated),
            "E" => Some(Self::Exempt),
            "AE" => Some(Self::ReverseCharge),
            "K" => Some(Self::IntraCommunitySupply),
            "G" => Some(Self::Export),
            "O" => Some(Self::NotSubjectToVat),
            _ => None,
        }
    }
}

/// BG-23: VAT breakdown per category/rate combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatBreakdown {
    /// BT-118.
    #[serde(rename = "kategorie")]
    pub category: TaxCategory,
    /// BT-119: Rate in percent.
    #[serde(rename = "satz")]
    pub rate: Decimal,
    /// BT-116: Taxable amount.
    #[serde(rename = "steuerbasisbetrag")]
    pub taxable_amount: Decimal,
    /// BT-117: Tax amount.
    #[serde(rename = "steuerbetrag")]
    pub tax_amount: Decimal,
}

/// BG-22: Document totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// BT-106 / BT-109: Sum of line net amounts.
    #[serde(rename = "gesamt_netto")]
    pub net_total: Decimal,
    /// BT-110: Total VAT.
    #[serde(rename = "gesamt_umsatzsteuer")]
    pub vat_total: Decimal,
    /// BT-112: net_total + vat_total.
    #[serde(rename = "gesamt_brutto")]
    pub gross_total: Decimal,
    /// BT-115: Amount due. Equal to gross_total; prepayments are not modeled.
    #[serde(rename = "zahlbetrag")]
    pub amount_due: Decimal,
}

/// BG-16: Payment instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInstructions {
    /// Payment method as written on the invoice (e.g. "SEPA", "Überweisung").
    #[serde(rename = "zahlungsart")]
    pub method: String,
    /// BT-84: IBAN, without spaces.
    pub iban: Option<String>,
    /// BT-86: BIC.
    pub bic: Option<String>,
}

/// BT-22: A free-text remark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remark {
    pub text: String,
}
