//! XRechnung XML rendering (UBL + CII).
//!
//! Both renderers take the canonical [`Invoice`](crate::core::Invoice) by
//! reference and never recompute amounts: what normalization produced is
//! what gets written.
//!
//! # Supported syntaxes
//!
//! - **UBL 2.1**: OASIS Universal Business Language ([`to_ubl_xml`])
//! - **CII**: UN/CEFACT Cross Industry Invoice ([`to_cii_xml`]), also the
//!   payload of ZUGFeRD / Factur-X

mod cii;
mod ubl;
pub mod units;
pub(crate) mod xml_utils;

pub use cii::to_cii_xml;
pub use ubl::to_ubl_xml;
pub use xml_utils::payment_means_code;

/// XRechnung 3.0 specification identifier (BT-24).
pub const XRECHNUNG_CUSTOMIZATION_ID: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0";

/// Business process identifier (BT-23).
pub const XRECHNUNG_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// UBL 2.1 namespace URIs.
pub mod ubl_ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// CII namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}
