//! Library catalog
//!
//! This module provides the LibraryCatalog that orchestrates the checkout
//! lifecycle by coordinating the book/item collections, the MemberRegistry,
//! the ReservationQueue, the fine ledger and a Notifier.
//!
//! The catalog enforces business rules such as:
//! - Copy status checks before checkout and return
//! - Per-member checkout limits and fine-based blocking
//! - FIFO reservation fulfilment (return → set aside → checkout by holder)
//! - Referential integrity when withdrawing a book
//!
//! Every operation validates all of its preconditions before touching any
//! state, so a rejected request leaves the catalog exactly as it was.
//! Notifications are sent after the state change and never fail the operation.

use crate::core::fine::{compute_fine, days_overdue};
use crate::core::member_registry::MemberRegistry;
use crate::core::notification::{LogNotifier, Notifier};
use crate::core::policy::LibraryPolicy;
use crate::core::reservation_queue::ReservationQueue;
use crate::types::{
    Book, BookItem, Fine, Isbn, ItemId, ItemStatus, LibraryError, LibraryEvent, Loan, Member,
    MemberId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Catalog search criteria
///
/// Text criteria match case-insensitive substrings; the publication date
/// must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Title(String),
    Author(String),
    Subject(String),
    Published(NaiveDate),
}

impl SearchQuery {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            SearchQuery::Title(q) => contains_ignore_case(&book.title, q),
            SearchQuery::Author(q) => contains_ignore_case(&book.author, q),
            SearchQuery::Subject(q) => contains_ignore_case(&book.subject, q),
            SearchQuery::Published(date) => book.published == *date,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Catalog statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total_books: usize,
    pub total_items: usize,
    pub total_members: usize,
    pub available: usize,
    pub checked_out: usize,
    pub reserved: usize,
    pub lost: usize,
    /// Reservations queued across all books
    pub reservations: usize,
}

/// Library catalog
///
/// Owns every book, copy and member, and runs the checkout, return and
/// reservation workflows. Constructed explicitly and passed around; tests can
/// create as many independent catalogs as they need.
pub struct LibraryCatalog<N: Notifier = LogNotifier> {
    policy: LibraryPolicy,
    books: BTreeMap<Isbn, Book>,
    items: BTreeMap<ItemId, BookItem>,
    members: MemberRegistry,
    reservations: ReservationQueue,
    /// Fines in the order they were assessed
    fines: Vec<Fine>,
    notifier: N,
}

impl<N: Notifier> LibraryCatalog<N> {
    /// Create an empty catalog
    pub fn new(policy: LibraryPolicy, notifier: N) -> Self {
        LibraryCatalog {
            policy,
            books: BTreeMap::new(),
            items: BTreeMap::new(),
            members: MemberRegistry::new(),
            reservations: ReservationQueue::new(),
            fines: Vec::new(),
            notifier,
        }
    }

    pub fn policy(&self) -> &LibraryPolicy {
        &self.policy
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn item(&self, id: &str) -> Option<&BookItem> {
        self.items.get(id)
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// All books ordered by ISBN
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// All copies ordered by item ID
    pub fn items(&self) -> impl Iterator<Item = &BookItem> {
        self.items.values()
    }

    /// All members ordered by member ID
    pub fn members(&self) -> Vec<&Member> {
        self.members.all_members()
    }

    /// Fines in the order they were assessed
    pub fn fines(&self) -> &[Fine] {
        &self.fines
    }

    pub fn reservations(&self) -> &ReservationQueue {
        &self.reservations
    }

    /// Copies of one book, ordered by item ID
    pub fn copies_of<'a>(&'a self, isbn: &'a str) -> impl Iterator<Item = &'a BookItem> + 'a {
        self.items.values().filter(move |item| item.isbn == isbn)
    }

    /// Copies of a book currently on the shelf
    pub fn available_items(&self, isbn: &str) -> Vec<&BookItem> {
        self.items
            .values()
            .filter(|item| item.isbn == isbn && item.is_available())
            .collect()
    }

    /// Add a book to the catalog
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBook` if the ISBN is already catalogued.
    pub fn add_book(&mut self, book: Book) -> Result<(), LibraryError> {
        if self.books.contains_key(&book.isbn) {
            return Err(LibraryError::DuplicateBook { isbn: book.isbn });
        }
        self.books.insert(book.isbn.clone(), book);
        Ok(())
    }

    /// Add a physical copy of a catalogued book
    ///
    /// New copies enter on the shelf. If members are waiting for the book, the
    /// copy is set aside for the earliest of them straight away and that
    /// member is notified.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The item ID is already catalogued (`DuplicateItem`)
    /// - The book is unknown (`NotFound`)
    pub fn add_item(&mut self, item: BookItem, on: NaiveDate) -> Result<(), LibraryError> {
        if self.items.contains_key(&item.id) {
            return Err(LibraryError::DuplicateItem { item: item.id });
        }
        if !self.books.contains_key(&item.isbn) {
            return Err(LibraryError::book_not_found(&item.isbn));
        }

        let (id, isbn) = (item.id.clone(), item.isbn.clone());
        self.items.insert(id.clone(), item);

        if let Some(holder) = self.hand_over(&id, on) {
            self.send_reservation_ready(&holder, &isbn);
        }
        Ok(())
    }

    /// Register a member
    ///
    /// Members join holding nothing; any held items on the passed value are
    /// discarded. An opening outstanding balance is kept.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMember` if the ID is already registered.
    pub fn add_member(&mut self, mut member: Member) -> Result<(), LibraryError> {
        member.held.clear();
        self.members.register(member)
    }

    /// Withdraw a book and all of its copies
    ///
    /// Lost and shelved copies go with the book; pending reservations for it
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The book is unknown (`NotFound`)
    /// - Any copy is checked out or set aside for a reservation (`BookInUse`)
    pub fn remove_book(&mut self, isbn: &str) -> Result<Book, LibraryError> {
        if !self.books.contains_key(isbn) {
            return Err(LibraryError::book_not_found(isbn));
        }

        let in_use = self.copies_of(isbn).filter(|item| item.is_in_use()).count();
        if in_use > 0 {
            return Err(LibraryError::book_in_use(isbn, in_use));
        }

        self.items.retain(|_, item| item.isbn != isbn);
        let dropped = self.reservations.drop_book(isbn);
        if dropped > 0 {
            tracing::info!(isbn, dropped, "dropped reservations for withdrawn book");
        }

        self.books
            .remove(isbn)
            .ok_or_else(|| LibraryError::book_not_found(isbn))
    }

    /// Lend a copy to a member
    ///
    /// A copy on the shelf can go to any eligible member. A copy set aside for
    /// a reservation can only go to the member it is held for. On success the
    /// member's reservation for the book is removed from the queue, and a copy
    /// still set aside for them passes to the next member in line.
    ///
    /// # Returns
    ///
    /// The due date of the new loan.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The item or member is unknown (`NotFound`)
    /// - The copy is set aside for someone else (`ReservedForAnother`)
    /// - The copy is checked out or lost (`ItemUnavailable`)
    /// - The member already holds the maximum (`CheckoutLimitExceeded`)
    /// - The member's fines exceed the threshold (`MemberBlocked`)
    pub fn checkout(
        &mut self,
        item_id: &str,
        member_id: &str,
        on: NaiveDate,
    ) -> Result<NaiveDate, LibraryError> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| LibraryError::item_not_found(item_id))?;
        self.members.require(member_id)?;

        match &item.status {
            ItemStatus::Available => {}
            ItemStatus::Reserved { holder, .. } if holder == member_id => {}
            ItemStatus::Reserved { holder, .. } => {
                return Err(LibraryError::reserved_for_another(
                    item_id, holder, member_id,
                ));
            }
            other => return Err(LibraryError::item_unavailable(item_id, other.label())),
        }

        self.members.ensure_can_borrow(member_id, &self.policy)?;

        let due = self
            .policy
            .due_date(on)
            .ok_or_else(|| LibraryError::arithmetic_overflow("due date", item_id))?;
        let isbn = item.isbn.clone();

        self.members.attach_item(member_id, item_id)?;
        if let Some(item) = self.items.get_mut(item_id) {
            item.status = ItemStatus::CheckedOut(Loan {
                borrower: member_id.to_string(),
                checked_out_on: on,
                due,
            });
        }
        let released = self
            .reservations
            .fulfil(&isbn, member_id)
            .and_then(|reservation| reservation.ready_item)
            .filter(|ready| ready != item_id);

        tracing::debug!(item = item_id, member = member_id, %due, "checked out");

        if let Some(holder) = released.and_then(|released| self.hand_over(&released, on)) {
            self.send_reservation_ready(&holder, &isbn);
        }
        Ok(due)
    }

    /// Bring a copy back
    ///
    /// A late return creates a fine, adds it to the borrower's balance and
    /// sends them an overdue notice. The copy is then set aside for the
    /// earliest waiting reservation (whose member is notified) or goes back
    /// on the shelf.
    ///
    /// # Returns
    ///
    /// The fine assessed, zero if the copy was on time.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The item is unknown (`NotFound`)
    /// - The copy is not checked out (`NotCheckedOut`)
    /// - The fine or balance would overflow (`ArithmeticOverflow`)
    pub fn return_item(&mut self, item_id: &str, on: NaiveDate) -> Result<Decimal, LibraryError> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| LibraryError::item_not_found(item_id))?;
        let loan = match &item.status {
            ItemStatus::CheckedOut(loan) => loan.clone(),
            other => return Err(LibraryError::not_checked_out(item_id, other.label())),
        };
        let isbn = item.isbn.clone();

        self.members.require(&loan.borrower)?;
        let fine = compute_fine(loan.due, on, self.policy.daily_fine_rate)?;
        let balance = if fine > Decimal::ZERO {
            Some(self.members.balance_after_fine(&loan.borrower, fine)?)
        } else {
            None
        };

        if let Some(balance) = balance {
            self.members.set_outstanding(&loan.borrower, balance)?;
            self.fines.push(Fine {
                item: item_id.to_string(),
                member: loan.borrower.clone(),
                amount: fine,
                assessed_on: on,
            });
        }
        self.members.detach_item(&loan.borrower, item_id)?;

        let holder = self.hand_over(item_id, on);

        tracing::debug!(item = item_id, member = %loan.borrower, %fine, "returned");

        if on > loan.due {
            self.send_overdue(&loan.borrower, item_id, days_overdue(loan.due, on));
        }
        if let Some(holder) = holder {
            self.send_reservation_ready(&holder, &isbn);
        }
        Ok(fine)
    }

    /// Queue a member for the next free copy of a book
    ///
    /// Reservations are only accepted while no copy is on the shelf.
    ///
    /// # Returns
    ///
    /// The member's 1-based position in the book's queue.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The book or member is unknown (`NotFound`)
    /// - A copy is on the shelf (`CopyAvailable`)
    /// - The member has a copy of this book checked out (`AlreadyBorrowed`)
    /// - The member is already queued for the book (`DuplicateReservation`)
    pub fn reserve(
        &mut self,
        isbn: &str,
        member_id: &str,
        on: NaiveDate,
    ) -> Result<usize, LibraryError> {
        if !self.books.contains_key(isbn) {
            return Err(LibraryError::book_not_found(isbn));
        }
        self.members.require(member_id)?;

        if self.copies_of(isbn).any(BookItem::is_available) {
            return Err(LibraryError::copy_available(isbn));
        }

        let borrowed = self
            .copies_of(isbn)
            .any(|item| item.borrower().is_some_and(|b| b == member_id));
        if borrowed {
            return Err(LibraryError::already_borrowed(isbn, member_id));
        }

        let position = self.reservations.enqueue(isbn, member_id, on)?;
        tracing::debug!(isbn, member = member_id, position, "reserved");
        Ok(position)
    }

    /// Report a copy as lost
    ///
    /// A lost checked-out copy is taken off its borrower's account. A lost
    /// set-aside copy puts its reservation back in the queue; if another copy
    /// of the book is on the shelf it is set aside for that member on `on`,
    /// otherwise the reservation waits for the next returned copy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown item and `ItemUnavailable` if the
    /// copy is already lost.
    pub fn mark_lost(&mut self, item_id: &str, on: NaiveDate) -> Result<(), LibraryError> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| LibraryError::item_not_found(item_id))?;
        let status = item.status.clone();
        let isbn = item.isbn.clone();

        let released = match status {
            ItemStatus::Available => false,
            ItemStatus::CheckedOut(loan) => {
                self.members.detach_item(&loan.borrower, item_id)?;
                false
            }
            ItemStatus::Reserved { .. } => self.reservations.release(&isbn, item_id).is_some(),
            ItemStatus::Lost => return Err(LibraryError::item_unavailable(item_id, "lost")),
        };

        if let Some(item) = self.items.get_mut(item_id) {
            item.status = ItemStatus::Lost;
        }
        tracing::info!(item = item_id, isbn = %isbn, "copy reported lost");

        if released {
            let shelved = self
                .copies_of(&isbn)
                .find(|item| item.is_available())
                .map(|item| item.id.clone());
            if let Some(holder) = shelved.and_then(|shelved| self.hand_over(&shelved, on)) {
                self.send_reservation_ready(&holder, &isbn);
            }
        }
        Ok(())
    }

    /// Remind every borrower whose copy is past due on `on`
    ///
    /// Runs only when asked; nothing in the catalog schedules it.
    ///
    /// # Returns
    ///
    /// Number of reminders attempted.
    pub fn send_overdue_notices(&self, on: NaiveDate) -> usize {
        let overdue: Vec<(&str, &str, i64)> = self
            .items
            .values()
            .filter_map(|item| {
                let loan = item.loan()?;
                (on > loan.due).then(|| {
                    (
                        loan.borrower.as_str(),
                        item.id.as_str(),
                        days_overdue(loan.due, on),
                    )
                })
            })
            .collect();

        for (member, item, days) in &overdue {
            self.send_overdue(member, item, *days);
        }
        overdue.len()
    }

    /// Books matching the query, ordered by ISBN
    pub fn search(&self, query: &SearchQuery) -> Vec<&Book> {
        self.books
            .values()
            .filter(|book| query.matches(book))
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            total_books: self.books.len(),
            total_items: self.items.len(),
            total_members: self.members.len(),
            reservations: self.reservations.total(),
            ..CatalogStats::default()
        };

        for item in self.items.values() {
            match item.status {
                ItemStatus::Available => stats.available += 1,
                ItemStatus::CheckedOut(_) => stats.checked_out += 1,
                ItemStatus::Reserved { .. } => stats.reserved += 1,
                ItemStatus::Lost => stats.lost += 1,
            }
        }
        stats
    }

    /// Apply a single event to the catalog
    ///
    /// Routes the event to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns whatever the routed operation returns.
    pub fn apply(&mut self, event: LibraryEvent) -> Result<(), LibraryError> {
        match event {
            LibraryEvent::Checkout { item, member, on } => {
                self.checkout(&item, &member, on).map(|_| ())
            }
            LibraryEvent::Return { item, on } => self.return_item(&item, on).map(|_| ()),
            LibraryEvent::Reserve { isbn, member, on } => {
                self.reserve(&isbn, &member, on).map(|_| ())
            }
            LibraryEvent::Lost { item, on } => self.mark_lost(&item, on),
            LibraryEvent::Remind { on } => {
                let sent = self.send_overdue_notices(on);
                tracing::debug!(%on, sent, "overdue reminders sent");
                Ok(())
            }
            LibraryEvent::Remove { isbn, .. } => self.remove_book(&isbn).map(|_| ()),
        }
    }

    /// Check the cross-references between copies, members and reservations
    ///
    /// # Returns
    ///
    /// A description of every inconsistency found; empty when the catalog is
    /// consistent.
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for item in self.items.values() {
            if !self.books.contains_key(&item.isbn) {
                violations.push(format!(
                    "item {} refers to unknown book {}",
                    item.id, item.isbn
                ));
            }
            match &item.status {
                ItemStatus::CheckedOut(loan) => {
                    let held = self
                        .members
                        .get(&loan.borrower)
                        .is_some_and(|m| m.holds(&item.id));
                    if !held {
                        violations.push(format!(
                            "item {} is checked out to {} who does not hold it",
                            item.id, loan.borrower
                        ));
                    }
                    if loan.due < loan.checked_out_on {
                        violations.push(format!("item {} is due before it left", item.id));
                    }
                }
                ItemStatus::Reserved { holder, .. } => {
                    let set_aside = self
                        .reservations
                        .entries(&item.isbn)
                        .any(|r| &r.member == holder && r.ready_item.as_ref() == Some(&item.id));
                    if !set_aside {
                        violations.push(format!(
                            "item {} is reserved for {} without a matching reservation",
                            item.id, holder
                        ));
                    }
                }
                ItemStatus::Available | ItemStatus::Lost => {}
            }
        }

        for member in self.members.all_members() {
            if member.held_count() > self.policy.max_books_per_member {
                violations.push(format!("member {} holds too many items", member.id));
            }
            for held in &member.held {
                let lent = self
                    .items
                    .get(held)
                    .and_then(BookItem::borrower)
                    .is_some_and(|b| b == &member.id);
                if !lent {
                    violations.push(format!(
                        "member {} holds item {} which is not lent to them",
                        member.id, held
                    ));
                }
            }
        }

        for reservation in self.reservations.iter() {
            let borrowed = self
                .copies_of(&reservation.isbn)
                .any(|item| item.borrower() == Some(&reservation.member));
            if borrowed {
                violations.push(format!(
                    "member {} is queued for {} while holding a copy",
                    reservation.member, reservation.isbn
                ));
            }
            let shelved = self
                .copies_of(&reservation.isbn)
                .any(BookItem::is_available);
            if reservation.is_waiting() && shelved {
                violations.push(format!(
                    "reservation of {} for {} waits while a copy is on the shelf",
                    reservation.member, reservation.isbn
                ));
            }
        }

        violations
    }

    /// Set a copy aside for the earliest waiting reservation of its book, or
    /// put it back on the shelf when nobody is waiting
    ///
    /// # Returns
    ///
    /// The member the copy is now held for.
    fn hand_over(&mut self, item_id: &str, on: NaiveDate) -> Option<MemberId> {
        let item = self.items.get_mut(item_id)?;
        let holder = self.reservations.assign_next(&item.isbn, item_id);
        item.status = match &holder {
            Some(holder) => ItemStatus::Reserved {
                holder: holder.clone(),
                since: on,
            },
            None => ItemStatus::Available,
        };
        holder
    }

    fn send_overdue(&self, member_id: &str, item_id: &str, days: i64) {
        let (Some(member), Some(item)) = (self.members.get(member_id), self.items.get(item_id))
        else {
            return;
        };
        let Some(book) = self.books.get(&item.isbn) else {
            return;
        };

        if let Err(error) = self.notifier.notify_overdue(member, item, book, days) {
            tracing::warn!(%error, member = member_id, item = item_id, "overdue notice dropped");
        }
    }

    fn send_reservation_ready(&self, member_id: &str, isbn: &str) {
        let (Some(member), Some(book)) = (self.members.get(member_id), self.books.get(isbn)) else {
            return;
        };

        if let Err(error) = self.notifier.notify_reservation_ready(member, book) {
            tracing::warn!(%error, member = member_id, isbn, "reservation notice dropped");
        }
    }
}

impl Default for LibraryCatalog<LogNotifier> {
    fn default() -> Self {
        Self::new(LibraryPolicy::default(), LogNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notification::{Notification, RecordingNotifier};
    use crate::types::NotificationError;

    const JAVA: &str = "978-0134685991";
    const CLEAN: &str = "978-0135166307";
    const PATTERNS: &str = "978-0201633610";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        date(2024, 3, d)
    }

    /// Three books, four copies (two of Effective Java), three members
    fn catalog() -> LibraryCatalog<RecordingNotifier> {
        let mut catalog = LibraryCatalog::new(LibraryPolicy::default(), RecordingNotifier::new());

        let books = [
            (JAVA, "Effective Java", "Joshua Bloch", "Programming", date(2017, 12, 27)),
            (CLEAN, "Clean Code", "Robert Martin", "Programming", date(2008, 8, 1)),
            (PATTERNS, "Design Patterns", "Gang of Four", "Software Design", date(1994, 10, 31)),
        ];
        for (isbn, title, author, subject, published) in books {
            catalog
                .add_book(Book::new(isbn, title, author, subject, published))
                .unwrap();
        }

        let items = [
            ("ITEM001", JAVA, "A1-001"),
            ("ITEM002", JAVA, "A1-002"),
            ("ITEM003", CLEAN, "A2-001"),
            ("ITEM004", PATTERNS, "A3-001"),
        ];
        for (id, isbn, rack) in items {
            catalog
                .add_item(BookItem::new(id, isbn, rack), day(1))
                .unwrap();
        }

        let members = [
            ("MEM001", "Alice Johnson", "123 Main St"),
            ("MEM002", "Bob Smith", "456 Oak Ave"),
            ("MEM003", "Carol White", "789 Pine Rd"),
        ];
        for (id, name, contact) in members {
            catalog.add_member(Member::new(id, name, contact)).unwrap();
        }

        catalog
    }

    fn reserved_for<'a, N: Notifier>(catalog: &'a LibraryCatalog<N>, id: &str) -> Option<&'a str> {
        catalog.item(id).unwrap().reserved_for().map(String::as_str)
    }

    fn borrower<'a, N: Notifier>(catalog: &'a LibraryCatalog<N>, id: &str) -> Option<&'a str> {
        catalog.item(id).unwrap().borrower().map(String::as_str)
    }

    fn assert_consistent<N: Notifier>(catalog: &LibraryCatalog<N>) {
        let violations = catalog.integrity_violations();
        assert!(violations.is_empty(), "integrity violations: {:?}", violations);
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify_overdue(
            &self,
            member: &Member,
            _item: &BookItem,
            _book: &Book,
            _days_overdue: i64,
        ) -> Result<(), NotificationError> {
            Err(NotificationError::DeliveryFailed {
                member: member.id.clone(),
                reason: "offline".to_string(),
            })
        }

        fn notify_reservation_ready(
            &self,
            member: &Member,
            _book: &Book,
        ) -> Result<(), NotificationError> {
            Err(NotificationError::DeliveryFailed {
                member: member.id.clone(),
                reason: "offline".to_string(),
            })
        }
    }

    #[test]
    fn test_checkout_sets_loan_and_due_date() {
        let mut catalog = catalog();

        let due = catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        assert_eq!(due, day(15));
        assert_eq!(borrower(&catalog, "ITEM001"), Some("MEM001"));
        assert_eq!(catalog.item("ITEM001").unwrap().due_date(), Some(day(15)));
        assert!(catalog.member("MEM001").unwrap().holds("ITEM001"));
        assert_consistent(&catalog);
    }

    #[test]
    fn test_available_items_outlive_query_text() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        let available = {
            let isbn = JAVA.to_string();
            catalog
                .available_items(&isbn)
                .iter()
                .map(|item| item.id.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(available, vec!["ITEM002"]);
        assert_eq!(catalog.available_items(PATTERNS).len(), 1);
    }

    #[test]
    fn test_checkout_unknown_entities() {
        let mut catalog = catalog();

        assert_eq!(
            catalog.checkout("ITEM999", "MEM001", day(1)).unwrap_err(),
            LibraryError::item_not_found("ITEM999")
        );
        assert_eq!(
            catalog.checkout("ITEM001", "MEM999", day(1)).unwrap_err(),
            LibraryError::member_not_found("MEM999")
        );
        assert!(catalog.item("ITEM001").unwrap().is_available());
    }

    #[test]
    fn test_checkout_of_checked_out_item_fails() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        let result = catalog.checkout("ITEM001", "MEM002", day(2));

        assert_eq!(
            result.unwrap_err(),
            LibraryError::item_unavailable("ITEM001", "checked_out")
        );
        assert_eq!(catalog.member("MEM002").unwrap().held_count(), 0);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_sixth_checkout_exceeds_limit() {
        let mut catalog = catalog();
        catalog
            .add_book(Book::new("BULK", "Bulk Title", "Anon", "Misc", date(2000, 1, 1)))
            .unwrap();
        for n in 1..=6 {
            catalog
                .add_item(BookItem::new(format!("BULK{}", n), "BULK", "Z9"), day(1))
                .unwrap();
        }

        for n in 1..=5 {
            catalog
                .checkout(&format!("BULK{}", n), "MEM001", day(1))
                .unwrap();
        }
        let result = catalog.checkout("BULK6", "MEM001", day(1));

        assert_eq!(
            result.unwrap_err(),
            LibraryError::checkout_limit_exceeded("MEM001", 5, 5)
        );
        assert!(catalog.item("BULK6").unwrap().is_available());
        assert_consistent(&catalog);
    }

    #[test]
    fn test_immediate_return_has_no_fine() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        let fine = catalog.return_item("ITEM001", day(1)).unwrap();

        assert_eq!(fine, Decimal::ZERO);
        assert!(catalog.fines().is_empty());
        assert!(catalog.item("ITEM001").unwrap().is_available());
        assert!(catalog.notifier().sent().is_empty());
        assert_consistent(&catalog);
    }

    #[test]
    fn test_return_three_days_late() {
        let mut catalog = catalog();
        let due = catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        let fine = catalog.return_item("ITEM001", day(18)).unwrap();

        assert_eq!(due, day(15));
        assert_eq!(fine, Decimal::new(150, 2));
        assert_eq!(
            catalog.member("MEM001").unwrap().outstanding,
            Decimal::new(150, 2)
        );
        assert_eq!(
            catalog.fines(),
            &[Fine {
                item: "ITEM001".to_string(),
                member: "MEM001".to_string(),
                amount: Decimal::new(150, 2),
                assessed_on: day(18),
            }]
        );

        let sent = catalog.notifier().sent_to("MEM001");
        assert_eq!(sent.len(), 1);
        assert!(matches!(
            &sent[0],
            Notification::Overdue { days_overdue: 3, .. }
        ));
        assert_consistent(&catalog);
    }

    #[test]
    fn test_return_of_item_not_checked_out() {
        let mut catalog = catalog();

        assert_eq!(
            catalog.return_item("ITEM001", day(1)).unwrap_err(),
            LibraryError::not_checked_out("ITEM001", "available")
        );
    }

    #[test]
    fn test_member_blocked_by_fines() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();
        // 25 days late at 0.50 = 12.50, above the 10.00 threshold
        catalog.return_item("ITEM001", date(2024, 4, 9)).unwrap();

        let result = catalog.checkout("ITEM003", "MEM001", date(2024, 4, 9));

        assert_eq!(
            result.unwrap_err(),
            LibraryError::member_blocked("MEM001", Decimal::new(1250, 2), Decimal::new(1000, 2))
        );
        assert!(catalog.item("ITEM003").unwrap().is_available());
    }

    #[test]
    fn test_reserve_fails_when_copy_available() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        // ITEM002 is still on the shelf
        assert_eq!(
            catalog.reserve(JAVA, "MEM002", day(2)).unwrap_err(),
            LibraryError::copy_available(JAVA)
        );
        assert_eq!(catalog.reservations().len(JAVA), 0);
    }

    #[test]
    fn test_reserve_rejects_duplicates_and_borrowers() {
        let mut catalog = catalog();
        catalog.checkout("ITEM003", "MEM001", day(1)).unwrap();

        assert_eq!(catalog.reserve(CLEAN, "MEM002", day(2)).unwrap(), 1);
        assert_eq!(
            catalog.reserve(CLEAN, "MEM002", day(3)).unwrap_err(),
            LibraryError::duplicate_reservation(CLEAN, "MEM002")
        );
        assert_eq!(
            catalog.reserve(CLEAN, "MEM001", day(3)).unwrap_err(),
            LibraryError::already_borrowed(CLEAN, "MEM001")
        );
        assert_eq!(
            catalog.reserve("978-0000000000", "MEM002", day(3)).unwrap_err(),
            LibraryError::book_not_found("978-0000000000")
        );
    }

    #[test]
    fn test_reservation_scenario() {
        let mut catalog = catalog();
        catalog.checkout("ITEM003", "MEM001", day(1)).unwrap();
        catalog.reserve(CLEAN, "MEM002", day(2)).unwrap();

        catalog.return_item("ITEM003", day(5)).unwrap();

        assert_eq!(reserved_for(&catalog, "ITEM003"), Some("MEM002"));
        assert_eq!(
            catalog.notifier().sent(),
            vec![Notification::ReservationReady {
                member: "MEM002".to_string(),
                isbn: CLEAN.to_string(),
                message: "The book 'Clean Code' you reserved is now available for checkout."
                    .to_string(),
            }]
        );
        // The reservation is not consumed by the return
        assert_eq!(catalog.reservations().len(CLEAN), 1);
        assert_consistent(&catalog);

        assert_eq!(
            catalog.checkout("ITEM003", "MEM001", day(6)).unwrap_err(),
            LibraryError::reserved_for_another("ITEM003", "MEM002", "MEM001")
        );

        catalog.checkout("ITEM003", "MEM002", day(6)).unwrap();
        assert_eq!(borrower(&catalog, "ITEM003"), Some("MEM002"));
        assert!(catalog.reservations().peek_head(CLEAN).is_none());
        assert_consistent(&catalog);
    }

    #[test]
    fn test_reservations_are_fifo() {
        let mut catalog = catalog();
        catalog.checkout("ITEM003", "MEM001", day(1)).unwrap();
        catalog.reserve(CLEAN, "MEM002", day(2)).unwrap();
        catalog.reserve(CLEAN, "MEM003", day(3)).unwrap();

        catalog.return_item("ITEM003", day(4)).unwrap();
        assert_eq!(catalog.notifier().sent_to("MEM002").len(), 1);
        assert!(catalog.notifier().sent_to("MEM003").is_empty());

        catalog.checkout("ITEM003", "MEM002", day(5)).unwrap();
        catalog.return_item("ITEM003", day(6)).unwrap();

        assert_eq!(catalog.notifier().sent_to("MEM003").len(), 1);
        assert_eq!(reserved_for(&catalog, "ITEM003"), Some("MEM003"));
        assert_consistent(&catalog);
    }

    #[test]
    fn test_two_copies_go_to_two_waiting_members() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();
        catalog.checkout("ITEM002", "MEM003", day(1)).unwrap();
        catalog.reserve(JAVA, "MEM002", day(2)).unwrap();
        catalog
            .add_member(Member::new("MEM004", "Dan Brown", "1 Elm St"))
            .unwrap();
        catalog.reserve(JAVA, "MEM004", day(2)).unwrap();

        catalog.return_item("ITEM001", day(3)).unwrap();
        catalog.return_item("ITEM002", day(3)).unwrap();

        assert_eq!(reserved_for(&catalog, "ITEM001"), Some("MEM002"));
        assert_eq!(reserved_for(&catalog, "ITEM002"), Some("MEM004"));

        // The later reservation can be collected first
        catalog.checkout("ITEM002", "MEM004", day(4)).unwrap();
        assert_eq!(
            catalog.reservations().peek_head(JAVA).unwrap().member,
            "MEM002"
        );
        assert_consistent(&catalog);
    }

    #[test]
    fn test_new_copy_fulfils_waiting_reservation() {
        let mut catalog = catalog();
        catalog.checkout("ITEM004", "MEM001", day(1)).unwrap();
        catalog.reserve(PATTERNS, "MEM002", day(2)).unwrap();

        catalog
            .add_item(BookItem::new("ITEM005", PATTERNS, "A3-002"), day(3))
            .unwrap();

        assert_eq!(reserved_for(&catalog, "ITEM005"), Some("MEM002"));
        assert_eq!(catalog.notifier().sent_to("MEM002").len(), 1);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_lost_reserved_copy_returns_reservation_to_queue() {
        let mut catalog = catalog();
        catalog.checkout("ITEM003", "MEM001", day(1)).unwrap();
        catalog.reserve(CLEAN, "MEM002", day(2)).unwrap();
        catalog.return_item("ITEM003", day(3)).unwrap();

        catalog.mark_lost("ITEM003", day(4)).unwrap();

        assert_eq!(catalog.item("ITEM003").unwrap().status, ItemStatus::Lost);
        assert!(catalog.reservations().waiting(CLEAN));
        assert_eq!(
            catalog.mark_lost("ITEM003", day(4)).unwrap_err(),
            LibraryError::item_unavailable("ITEM003", "lost")
        );

        catalog
            .add_item(BookItem::new("ITEM006", CLEAN, "A2-002"), day(5))
            .unwrap();
        assert_eq!(reserved_for(&catalog, "ITEM006"), Some("MEM002"));
        assert_consistent(&catalog);
    }

    #[test]
    fn test_lost_set_aside_copy_passes_reservation_to_shelved_copy() {
        let mut catalog = catalog();
        catalog
            .add_member(Member::new("MEM004", "Dan Brown", "1 Elm St"))
            .unwrap();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();
        catalog.checkout("ITEM002", "MEM003", day(1)).unwrap();
        catalog.reserve(JAVA, "MEM002", day(2)).unwrap();
        catalog.return_item("ITEM001", day(3)).unwrap();
        catalog.return_item("ITEM002", day(3)).unwrap();
        assert!(catalog.item("ITEM002").unwrap().is_available());

        catalog.mark_lost("ITEM001", day(4)).unwrap();

        assert_eq!(
            catalog.item("ITEM002").unwrap().status,
            ItemStatus::Reserved {
                holder: "MEM002".to_string(),
                since: day(4),
            }
        );
        assert!(!catalog.reservations().waiting(JAVA));
        assert_eq!(catalog.notifier().sent_to("MEM002").len(), 2);
        assert_consistent(&catalog);

        assert_eq!(
            catalog.checkout("ITEM002", "MEM004", day(4)).unwrap_err(),
            LibraryError::reserved_for_another("ITEM002", "MEM002", "MEM004")
        );
        catalog.checkout("ITEM002", "MEM002", day(5)).unwrap();
        assert_eq!(catalog.reservations().len(JAVA), 0);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_checkout_of_shelved_copy_releases_set_aside_copy() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();
        catalog.checkout("ITEM002", "MEM003", day(1)).unwrap();
        catalog.reserve(JAVA, "MEM002", day(2)).unwrap();
        catalog.return_item("ITEM001", day(3)).unwrap();
        catalog.return_item("ITEM002", day(3)).unwrap();

        // ITEM001 waits for MEM002, who takes the copy on the shelf instead
        catalog.checkout("ITEM002", "MEM002", day(4)).unwrap();

        assert_eq!(catalog.reservations().len(JAVA), 0);
        assert!(catalog.item("ITEM001").unwrap().is_available());
        assert_consistent(&catalog);

        // A later return does not set a copy aside for MEM002 again
        catalog.checkout("ITEM001", "MEM001", day(5)).unwrap();
        catalog.return_item("ITEM001", day(6)).unwrap();
        assert!(catalog.item("ITEM001").unwrap().is_available());
        assert_eq!(catalog.notifier().sent_to("MEM002").len(), 1);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_lost_checked_out_copy_leaves_member() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        catalog.mark_lost("ITEM001", day(2)).unwrap();

        assert_eq!(catalog.member("MEM001").unwrap().held_count(), 0);
        assert_eq!(
            catalog.return_item("ITEM001", day(2)).unwrap_err(),
            LibraryError::not_checked_out("ITEM001", "lost")
        );
        assert_consistent(&catalog);
    }

    #[test]
    fn test_remove_book_in_use() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();

        assert_eq!(
            catalog.remove_book(JAVA).unwrap_err(),
            LibraryError::book_in_use(JAVA, 1)
        );
        assert!(catalog.book(JAVA).is_some());

        catalog.return_item("ITEM001", day(2)).unwrap();
        let removed = catalog.remove_book(JAVA).unwrap();

        assert_eq!(removed.title, "Effective Java");
        assert_eq!(catalog.copies_of(JAVA).count(), 0);
        assert_eq!(catalog.stats().total_items, 2);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_remove_book_with_reserved_copy_fails() {
        let mut catalog = catalog();
        catalog.checkout("ITEM004", "MEM001", day(1)).unwrap();
        catalog.reserve(PATTERNS, "MEM002", day(2)).unwrap();
        catalog.return_item("ITEM004", day(3)).unwrap();

        assert!(matches!(
            catalog.remove_book(PATTERNS).unwrap_err(),
            LibraryError::BookInUse { in_use: 1, .. }
        ));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut catalog = catalog();

        assert!(matches!(
            catalog.add_book(Book::new(JAVA, "Other", "Other", "Other", date(2000, 1, 1))),
            Err(LibraryError::DuplicateBook { .. })
        ));
        assert!(matches!(
            catalog.add_item(BookItem::new("ITEM001", CLEAN, "B1"), day(1)),
            Err(LibraryError::DuplicateItem { .. })
        ));
        assert!(matches!(
            catalog.add_member(Member::new("MEM001", "Other", "Other")),
            Err(LibraryError::DuplicateMember { .. })
        ));
        assert_eq!(
            catalog
                .add_item(BookItem::new("ITEM099", "UNKNOWN", "B1"), day(1))
                .unwrap_err(),
            LibraryError::book_not_found("UNKNOWN")
        );
    }

    #[test]
    fn test_search() {
        let catalog = catalog();

        let titles = |query: SearchQuery| -> Vec<String> {
            catalog.search(&query).iter().map(|b| b.title.clone()).collect()
        };

        assert_eq!(
            titles(SearchQuery::Title("java".to_string())),
            vec!["Effective Java"]
        );
        assert_eq!(
            titles(SearchQuery::Subject("PROGRAMMING".to_string())),
            vec!["Effective Java", "Clean Code"]
        );
        assert_eq!(
            titles(SearchQuery::Author("gang".to_string())),
            vec!["Design Patterns"]
        );
        assert_eq!(
            titles(SearchQuery::Published(date(2008, 8, 1))),
            vec!["Clean Code"]
        );
        assert!(titles(SearchQuery::Title("rust".to_string())).is_empty());
    }

    #[test]
    fn test_stats() {
        let mut catalog = catalog();
        catalog.checkout("ITEM003", "MEM001", day(1)).unwrap();
        catalog.reserve(CLEAN, "MEM002", day(2)).unwrap();
        catalog.checkout("ITEM004", "MEM001", day(1)).unwrap();
        catalog.mark_lost("ITEM002", day(2)).unwrap();

        let stats = catalog.stats();

        assert_eq!(
            stats,
            CatalogStats {
                total_books: 3,
                total_items: 4,
                total_members: 3,
                available: 1,
                checked_out: 2,
                reserved: 0,
                lost: 1,
                reservations: 1,
            }
        );
        assert_eq!(catalog.stats(), stats);
    }

    #[test]
    fn test_overdue_notices() {
        let mut catalog = catalog();
        catalog.checkout("ITEM001", "MEM001", day(1)).unwrap();
        catalog.checkout("ITEM003", "MEM002", day(10)).unwrap();

        assert_eq!(catalog.send_overdue_notices(day(15)), 0);
        assert_eq!(catalog.send_overdue_notices(day(20)), 1);

        let sent = catalog.notifier().sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(
            &sent[0],
            Notification::Overdue { member, days_overdue: 5, .. } if member == "MEM001"
        ));
    }

    #[test]
    fn test_apply_routes_events() {
        let mut catalog = catalog();

        catalog
            .apply(LibraryEvent::Checkout {
                item: "ITEM003".to_string(),
                member: "MEM001".to_string(),
                on: day(1),
            })
            .unwrap();
        catalog
            .apply(LibraryEvent::Reserve {
                isbn: CLEAN.to_string(),
                member: "MEM002".to_string(),
                on: day(2),
            })
            .unwrap();
        catalog
            .apply(LibraryEvent::Return {
                item: "ITEM003".to_string(),
                on: day(20),
            })
            .unwrap();
        catalog.apply(LibraryEvent::Remind { on: day(21) }).unwrap();

        let result = catalog.apply(LibraryEvent::Remove {
            isbn: CLEAN.to_string(),
            on: day(21),
        });

        assert!(matches!(result, Err(LibraryError::BookInUse { .. })));
        assert_eq!(
            catalog.member("MEM001").unwrap().outstanding,
            Decimal::new(250, 2)
        );
        assert_eq!(catalog.stats().reserved, 1);
        assert_consistent(&catalog);
    }

    #[test]
    fn test_failed_notifications_do_not_fail_operations() {
        let mut catalog = LibraryCatalog::new(LibraryPolicy::default(), FailingNotifier);
        let clean_code = Book::new(
            CLEAN,
            "Clean Code",
            "Robert Martin",
            "Programming",
            date(2008, 8, 1),
        );
        catalog.add_book(clean_code).unwrap();
        catalog
            .add_item(BookItem::new("ITEM003", CLEAN, "A2-001"), day(1))
            .unwrap();
        catalog
            .add_member(Member::new("MEM001", "Alice Johnson", "123 Main St"))
            .unwrap();
        catalog
            .add_member(Member::new("MEM002", "Bob Smith", "456 Oak Ave"))
            .unwrap();

        catalog.checkout("ITEM003", "MEM001", day(1)).unwrap();
        catalog.reserve(CLEAN, "MEM002", day(2)).unwrap();
        let fine = catalog.return_item("ITEM003", day(20)).unwrap();

        assert_eq!(fine, Decimal::new(250, 2));
        assert_eq!(reserved_for(&catalog, "ITEM003"), Some("MEM002"));
        assert_eq!(catalog.send_overdue_notices(day(20)), 0);
    }

    #[test]
    fn test_independent_catalogs() {
        let mut first = catalog();
        let second = catalog();

        first.checkout("ITEM001", "MEM001", day(1)).unwrap();

        assert_eq!(first.stats().checked_out, 1);
        assert_eq!(second.stats().checked_out, 0);
    }
}
