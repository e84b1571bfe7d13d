//! Library events
//!
//! An event is one request against the catalog, as it appears in a replayed
//! event log. Each variant carries exactly the identifiers its operation needs.

use super::book::{Isbn, ItemId};
use super::member::MemberId;
use chrono::NaiveDate;

/// Event types recognised in event logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Lend a copy to a member
    Checkout,
    /// Bring a copy back
    Return,
    /// Queue a member for the next free copy of a book
    Reserve,
    /// Report a copy as lost
    Lost,
    /// Send reminders for every overdue copy
    Remind,
    /// Withdraw a book and its copies from the catalog
    Remove,
}

/// A single request against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    Checkout {
        item: ItemId,
        member: MemberId,
        on: NaiveDate,
    },
    Return {
        item: ItemId,
        on: NaiveDate,
    },
    Reserve {
        isbn: Isbn,
        member: MemberId,
        on: NaiveDate,
    },
    Lost {
        item: ItemId,
        on: NaiveDate,
    },
    Remind {
        on: NaiveDate,
    },
    Remove {
        isbn: Isbn,
        on: NaiveDate,
    },
}

impl LibraryEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            LibraryEvent::Checkout { .. } => EventType::Checkout,
            LibraryEvent::Return { .. } => EventType::Return,
            LibraryEvent::Reserve { .. } => EventType::Reserve,
            LibraryEvent::Lost { .. } => EventType::Lost,
            LibraryEvent::Remind { .. } => EventType::Remind,
            LibraryEvent::Remove { .. } => EventType::Remove,
        }
    }

    /// Business date the event happened on
    pub fn date(&self) -> NaiveDate {
        match self {
            LibraryEvent::Checkout { on, .. }
            | LibraryEvent::Return { on, .. }
            | LibraryEvent::Reserve { on, .. }
            | LibraryEvent::Lost { on, .. }
            | LibraryEvent::Remind { on }
            | LibraryEvent::Remove { on, .. } => *on,
        }
    }
}
