//! Catalog entries and physical copies
//!
//! A [`Book`] is the bibliographic record; a [`BookItem`] is one physical copy
//! of it sitting on a rack. Copies refer to their book by ISBN and to their
//! borrower by member ID; the catalog resolves both.

use super::member::MemberId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Book identifier (ISBN)
pub type Isbn = String;

/// Physical copy identifier
pub type ItemId = String;

/// Catalog entry for a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: Isbn,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub published: NaiveDate,
}

impl Book {
    pub fn new(
        isbn: impl Into<Isbn>,
        title: impl Into<String>,
        author: impl Into<String>,
        subject: impl Into<String>,
        published: NaiveDate,
    ) -> Self {
        Book {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            subject: subject.into(),
            published,
        }
    }
}

/// An active loan of a copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    /// Member holding the copy
    pub borrower: MemberId,
    /// Date the copy left the library
    pub checked_out_on: NaiveDate,
    /// Last day the copy may be returned without a fine
    pub due: NaiveDate,
}

/// Lifecycle state of a physical copy
///
/// Borrower and due date only exist inside [`ItemStatus::CheckedOut`], so a
/// copy can never be "available with a borrower" or "checked out without a
/// due date".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemStatus {
    /// On the shelf
    #[default]
    Available,

    /// Lent to a member
    CheckedOut(Loan),

    /// Set aside for the member whose reservation it fulfils
    Reserved {
        /// Member the copy is held for
        holder: MemberId,
        /// Date the copy was set aside
        since: NaiveDate,
    },

    /// Reported lost; never lent again
    Lost,
}

impl ItemStatus {
    /// Short machine-friendly label used in messages and reports
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::CheckedOut(_) => "checked_out",
            ItemStatus::Reserved { .. } => "reserved",
            ItemStatus::Lost => "lost",
        }
    }
}

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookItem {
    pub id: ItemId,
    /// ISBN of the book this is a copy of
    pub isbn: Isbn,
    /// Rack location, e.g. `A1-001`
    pub rack: String,
    pub status: ItemStatus,
}

impl BookItem {
    /// Create a new copy on the shelf
    pub fn new(id: impl Into<ItemId>, isbn: impl Into<Isbn>, rack: impl Into<String>) -> Self {
        BookItem {
            id: id.into(),
            isbn: isbn.into(),
            rack: rack.into(),
            status: ItemStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, ItemStatus::Available)
    }

    pub fn loan(&self) -> Option<&Loan> {
        match &self.status {
            ItemStatus::CheckedOut(loan) => Some(loan),
            _ => None,
        }
    }

    pub fn borrower(&self) -> Option<&MemberId> {
        self.loan().map(|loan| &loan.borrower)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.loan().map(|loan| loan.due)
    }

    /// Member the copy is set aside for, if it is reserved
    pub fn reserved_for(&self) -> Option<&MemberId> {
        match &self.status {
            ItemStatus::Reserved { holder, .. } => Some(holder),
            _ => None,
        }
    }

    /// Whether the copy is out of the library's hands (lent or set aside)
    pub fn is_in_use(&self) -> bool {
        matches!(
            self.status,
            ItemStatus::CheckedOut(_) | ItemStatus::Reserved { .. }
        )
    }
}
