//! Error types for the library tracker
//!
//! This module defines all error types that can occur while loading inventory,
//! replaying events and running the checkout lifecycle. Errors are designed to be
//! descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid dates, etc.
//! - **Lifecycle Errors**: Unavailable copies, checkout limits, reservations, etc.
//! - **Arithmetic Errors**: Overflow in fine or due date calculations

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Kind of catalog entity referenced by a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Item,
    Member,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => write!(f, "Book"),
            EntityKind::Item => write!(f, "Item"),
            EntityKind::Member => write!(f, "Member"),
        }
    }
}

/// Main error type for the library tracker
///
/// Every catalog operation returns one of these variants on failure. All of
/// them are recoverable: the catalog state is left untouched and the caller
/// decides how to report the rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped
    /// and processing continues with the next one.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown ISBN, item ID or member ID
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What kind of entity was looked up
        kind: EntityKind,
        /// The identifier that was not found
        id: String,
    },

    /// The copy is not in a state that allows the operation
    ///
    /// Raised when checking out a copy that is checked out or lost, or when
    /// marking an already lost copy as lost.
    #[error("Item {item} is unavailable ({status})")]
    ItemUnavailable {
        /// Item ID
        item: String,
        /// Current status of the item
        status: String,
    },

    /// The member already holds the maximum number of items
    #[error("Member {member} already holds {held} items (limit {limit})")]
    CheckoutLimitExceeded {
        /// Member ID
        member: String,
        /// Number of items currently held
        held: usize,
        /// Configured limit
        limit: usize,
    },

    /// Outstanding fines exceed the blocking threshold
    #[error("Member {member} is blocked: outstanding fines {outstanding} exceed {threshold}")]
    MemberBlocked {
        /// Member ID
        member: String,
        /// Current outstanding balance
        outstanding: Decimal,
        /// Configured threshold
        threshold: Decimal,
    },

    /// A reservation was requested while a copy is on the shelf
    #[error("Book {isbn} has an available copy; no reservation needed")]
    CopyAvailable {
        /// ISBN of the book
        isbn: String,
    },

    /// The member is already queued for this book
    #[error("Member {member} has already reserved book {isbn}")]
    DuplicateReservation {
        /// ISBN of the book
        isbn: String,
        /// Member ID
        member: String,
    },

    /// The member currently has a copy of this book checked out
    #[error("Member {member} already has a copy of book {isbn} checked out")]
    AlreadyBorrowed {
        /// ISBN of the book
        isbn: String,
        /// Member ID
        member: String,
    },

    /// The copy is set aside for a different member's reservation
    #[error("Item {item} is reserved for member {holder}, not {member}")]
    ReservedForAnother {
        /// Item ID
        item: String,
        /// Member the copy is set aside for
        holder: String,
        /// Member who attempted the checkout
        member: String,
    },

    /// A return was attempted for a copy that is not checked out
    #[error("Item {item} is not checked out ({status})")]
    NotCheckedOut {
        /// Item ID
        item: String,
        /// Current status of the item
        status: String,
    },

    /// The book still has copies out or set aside
    #[error("Book {isbn} is in use: {in_use} copies checked out or reserved")]
    BookInUse {
        /// ISBN of the book
        isbn: String,
        /// Number of copies checked out or reserved
        in_use: usize,
    },

    /// A book with this ISBN is already catalogued
    #[error("Duplicate book ISBN {isbn}")]
    DuplicateBook {
        /// ISBN that is duplicated
        isbn: String,
    },

    /// An item with this ID is already catalogued
    #[error("Duplicate item ID {item}")]
    DuplicateItem {
        /// Item ID that is duplicated
        item: String,
    },

    /// A member with this ID is already registered
    #[error("Duplicate member ID {member}")]
    DuplicateMember {
        /// Member ID that is duplicated
        member: String,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to keep balances and dates consistent.
    #[error("Arithmetic overflow in {operation} for {subject}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Member or item the operation applied to
        subject: String,
    },
}

// Conversion from io::Error to LibraryError
impl From<std::io::Error> for LibraryError {
    fn from(error: std::io::Error) -> Self {
        LibraryError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LibraryError
impl From<csv::Error> for LibraryError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return LibraryError::IoError {
                message: error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.line());

        LibraryError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LibraryError {
    /// Create a NotFound error for a book
    pub fn book_not_found(isbn: &str) -> Self {
        LibraryError::NotFound {
            kind: EntityKind::Book,
            id: isbn.to_string(),
        }
    }

    /// Create a NotFound error for an item
    pub fn item_not_found(item: &str) -> Self {
        LibraryError::NotFound {
            kind: EntityKind::Item,
            id: item.to_string(),
        }
    }

    /// Create a NotFound error for a member
    pub fn member_not_found(member: &str) -> Self {
        LibraryError::NotFound {
            kind: EntityKind::Member,
            id: member.to_string(),
        }
    }

    /// Create an ItemUnavailable error
    pub fn item_unavailable(item: &str, status: &str) -> Self {
        LibraryError::ItemUnavailable {
            item: item.to_string(),
            status: status.to_string(),
        }
    }

    /// Create a CheckoutLimitExceeded error
    pub fn checkout_limit_exceeded(member: &str, held: usize, limit: usize) -> Self {
        LibraryError::CheckoutLimitExceeded {
            member: member.to_string(),
            held,
            limit,
        }
    }

    /// Create a MemberBlocked error
    pub fn member_blocked(member: &str, outstanding: Decimal, threshold: Decimal) -> Self {
        LibraryError::MemberBlocked {
            member: member.to_string(),
            outstanding,
            threshold,
        }
    }

    /// Create a CopyAvailable error
    pub fn copy_available(isbn: &str) -> Self {
        LibraryError::CopyAvailable {
            isbn: isbn.to_string(),
        }
    }

    /// Create a DuplicateReservation error
    pub fn duplicate_reservation(isbn: &str, member: &str) -> Self {
        LibraryError::DuplicateReservation {
            isbn: isbn.to_string(),
            member: member.to_string(),
        }
    }

    /// Create an AlreadyBorrowed error
    pub fn already_borrowed(isbn: &str, member: &str) -> Self {
        LibraryError::AlreadyBorrowed {
            isbn: isbn.to_string(),
            member: member.to_string(),
        }
    }

    /// Create a ReservedForAnother error
    pub fn reserved_for_another(item: &str, holder: &str, member: &str) -> Self {
        LibraryError::ReservedForAnother {
            item: item.to_string(),
            holder: holder.to_string(),
            member: member.to_string(),
        }
    }

    /// Create a NotCheckedOut error
    pub fn not_checked_out(item: &str, status: &str) -> Self {
        LibraryError::NotCheckedOut {
            item: item.to_string(),
            status: status.to_string(),
        }
    }

    /// Create a BookInUse error
    pub fn book_in_use(isbn: &str, in_use: usize) -> Self {
        LibraryError::BookInUse {
            isbn: isbn.to_string(),
            in_use,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, subject: &str) -> Self {
        LibraryError::ArithmeticOverflow {
            operation: operation.to_string(),
            subject: subject.to_string(),
        }
    }
}

/// Error returned by a [`Notifier`](crate::core::Notifier) when a message
/// could not be delivered
///
/// Delivery failures never abort a catalog operation; the catalog logs them
/// and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Failed to notify member {member}: {reason}")]
    DeliveryFailed { member: String, reason: String },
}
