//! Fine records
//!
//! A fine is assessed when a copy comes back after its due date. The record
//! stays in the catalog's ledger; the amount is also added to the member's
//! outstanding balance.

use super::book::ItemId;
use super::member::MemberId;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Fine assessed for a late return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fine {
    /// Copy that was returned late
    pub item: ItemId,

    /// Member who returned it
    pub member: MemberId,

    /// Amount owed for this return
    pub amount: Decimal,

    /// Date of the late return
    pub assessed_on: NaiveDate,
}
