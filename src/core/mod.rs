//! Core business logic module
//!
//! This module contains the checkout lifecycle components:
//! - `policy` - Lending policy constants (limits, loan period, fine rates)
//! - `fine` - Overdue fine computation
//! - `member_registry` - Member state and borrowing eligibility
//! - `reservation_queue` - Per-book FIFO reservation queues
//! - `notification` - Notifier abstraction and its implementations
//! - `catalog` - Lifecycle orchestration

pub mod catalog;
pub mod fine;
pub mod member_registry;
pub mod notification;
pub mod policy;
pub mod reservation_queue;

pub use catalog::{CatalogStats, LibraryCatalog, SearchQuery};
pub use fine::{compute_fine, days_overdue};
pub use member_registry::MemberRegistry;
pub use notification::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use policy::LibraryPolicy;
pub use reservation_queue::{Reservation, ReservationQueue};
