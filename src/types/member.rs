//! Member-related types
//!
//! This module defines the Member structure: identity, the copies a member
//! currently holds, and the fines they still owe.

use super::book::ItemId;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Member identifier
pub type MemberId = String;

/// Library member state
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,

    /// Postal address, e-mail or phone number
    pub contact: String,

    /// Items currently checked out by this member
    pub held: BTreeSet<ItemId>,

    /// Sum of fines assessed and not yet paid
    pub outstanding: Decimal,
}

impl Member {
    /// Create a member with no items and a zero balance
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
            contact: contact.into(),
            held: BTreeSet::new(),
            outstanding: Decimal::ZERO,
        }
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    pub fn holds(&self, item: &str) -> bool {
        self.held.contains(item)
    }
}
