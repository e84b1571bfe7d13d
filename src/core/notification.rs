//! Member notifications
//!
//! The catalog tells members about two things: a copy they hold is overdue,
//! and a copy of a book they reserved is waiting for them. Delivery goes
//! through the [`Notifier`] trait so the catalog does not care whether the
//! message ends up in a log, an outbox, or a test recorder.
//!
//! Delivery failures are reported back as [`NotificationError`]; the catalog
//! logs and drops them. There is no retry queue.

use crate::types::{Book, BookItem, Isbn, ItemId, Member, MemberId, NotificationError};
use std::cell::RefCell;

/// Delivers messages to members
pub trait Notifier {
    /// Tell a member that a copy they hold is past its due date
    fn notify_overdue(
        &self,
        member: &Member,
        item: &BookItem,
        book: &Book,
        days_overdue: i64,
    ) -> Result<(), NotificationError>;

    /// Tell a member that a copy of a book they reserved is waiting for them
    fn notify_reservation_ready(&self, member: &Member, book: &Book)
        -> Result<(), NotificationError>;
}

/// A delivered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Overdue {
        member: MemberId,
        item: ItemId,
        days_overdue: i64,
        message: String,
    },
    ReservationReady {
        member: MemberId,
        isbn: Isbn,
        message: String,
    },
}

impl Notification {
    pub fn overdue(member: &Member, item: &BookItem, book: &Book, days_overdue: i64) -> Self {
        Notification::Overdue {
            member: member.id.clone(),
            item: item.id.clone(),
            days_overdue,
            message: format!(
                "The book '{}' is {} days overdue. Please return it to avoid additional fines.",
                book.title, days_overdue
            ),
        }
    }

    pub fn reservation_ready(member: &Member, book: &Book) -> Self {
        Notification::ReservationReady {
            member: member.id.clone(),
            isbn: book.isbn.clone(),
            message: format!(
                "The book '{}' you reserved is now available for checkout.",
                book.title
            ),
        }
    }

    pub fn member(&self) -> &str {
        match self {
            Notification::Overdue { member, .. }
            | Notification::ReservationReady { member, .. } => member,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Overdue { message, .. }
            | Notification::ReservationReady { message, .. } => message,
        }
    }
}

/// Delivers notifications as structured log events
///
/// Every message is emitted at `info` level under the `notifications` target,
/// tagged with the member ID and name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    fn deliver(member: &Member, notification: &Notification) {
        tracing::info!(
            target: "notifications",
            member = %member.id,
            name = %member.name,
            "{}",
            notification.message()
        );
    }
}

impl Notifier for LogNotifier {
    fn notify_overdue(
        &self,
        member: &Member,
        item: &BookItem,
        book: &Book,
        days_overdue: i64,
    ) -> Result<(), NotificationError> {
        Self::deliver(member, &Notification::overdue(member, item, book, days_overdue));
        Ok(())
    }

    fn notify_reservation_ready(
        &self,
        member: &Member,
        book: &Book,
    ) -> Result<(), NotificationError> {
        Self::deliver(member, &Notification::reservation_ready(member, book));
        Ok(())
    }
}

/// Keeps every notification in memory
///
/// Useful for tests and for reporting what members were told during a run.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, oldest first
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }

    /// Notifications delivered to one member
    pub fn sent_to(&self, member: &str) -> Vec<Notification> {
        self.sent
            .borrow()
            .iter()
            .filter(|n| n.member() == member)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify_overdue(
        &self,
        member: &Member,
        item: &BookItem,
        book: &Book,
        days_overdue: i64,
    ) -> Result<(), NotificationError> {
        self.sent
            .borrow_mut()
            .push(Notification::overdue(member, item, book, days_overdue));
        Ok(())
    }

    fn notify_reservation_ready(
        &self,
        member: &Member,
        book: &Book,
    ) -> Result<(), NotificationError> {
        self.sent
            .borrow_mut()
            .push(Notification::reservation_ready(member, book));
        Ok(())
    }
}
