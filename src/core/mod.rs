//! Draft normalization and the canonical invoice record.
//!
//! [`normalize`] is the entry point. The stage modules are public so
//! callers can run or test a single step in isolation.

pub mod aggregate;
mod binding;
pub mod draft;
mod error;
pub mod money;
mod normalize;
pub mod recalc;
pub mod rules;
mod staging;
pub mod totals;
mod types;

pub use binding::*;
pub use error::*;
pub use normalize::normalize;
pub use staging::StagedInvoice;
pub use types::*;
