//! Library Checkout Tracker
//! # Overview
//!
//! This library tracks the lending lifecycle of a library: physical copies of
//! catalogued books are checked out by members, returned (possibly late, which
//! costs a fine), reserved when no copy is on the shelf, and handed to waiting
//! members in FIFO order.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Book, BookItem, Member, Fine, events, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::catalog`] - Lifecycle orchestration
//!   - [`core::member_registry`] - Member state and borrowing eligibility
//!   - [`core::reservation_queue`] - Per-book FIFO reservation queues
//!   - [`core::fine`] - Overdue fine computation
//!   - [`core::notification`] - Member notifications
//!   - [`core::policy`] - Lending policy
//! - [`io`] - CSV input and report output
//! - [`replay`] - Batch runs: load inventory, replay events, write a report
//! - [`telemetry`] - Logging setup
//!
//! # Copy Lifecycle
//!
//! Each copy is in exactly one state:
//!
//! - **Available**: On the shelf; any eligible member may check it out
//! - **CheckedOut**: Lent to a member until its due date
//! - **Reserved**: Set aside for the earliest waiting reservation of its book
//! - **Lost**: Reported lost; never lent again
//!
//! # Member Rules
//!
//! A member may hold at most `max_books_per_member` copies and may not borrow
//! while their outstanding fines exceed `fine_block_threshold`.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod telemetry;
pub mod types;

pub use crate::core::{
    CatalogStats, LibraryCatalog, LibraryPolicy, LogNotifier, Notifier, RecordingNotifier,
    SearchQuery,
};
pub use replay::{ReplaySession, ReplaySummary};
pub use types::{
    Book, BookItem, Fine, Isbn, ItemId, ItemStatus, LibraryError, LibraryEvent, Member, MemberId,
};
