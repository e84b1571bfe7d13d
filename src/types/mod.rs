//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `book`: Books, physical copies and their lifecycle status
//! - `member`: Member state
//! - `fine`: Fines assessed on late returns
//! - `event`: Requests replayed against the catalog
//! - `error`: Error types for the library tracker

pub mod book;
pub mod error;
pub mod event;
pub mod fine;
pub mod member;

pub use book::{Book, BookItem, Isbn, ItemId, ItemStatus, Loan};
pub use error::{EntityKind, LibraryError, NotificationError};
pub use event::{EventType, LibraryEvent};
pub use fine::Fine;
pub use member::{Member, MemberId};
