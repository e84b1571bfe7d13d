//! Reservation queues
//!
//! This module provides the ReservationQueue component: one FIFO waiting list
//! per book. A member appears at most once in a book's queue.
//!
//! # Set-aside copies
//!
//! When a copy of a book comes back and someone is waiting, the copy is set
//! aside for the earliest reservation that has no copy yet. The reservation
//! stays queued until its member checks the copy out; that is when it is
//! removed.
//!
//! Queues that become empty are discarded.

use crate::types::{Isbn, ItemId, LibraryError, MemberId};
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};

/// A member's claim on the next free copy of a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub isbn: Isbn,
    pub member: MemberId,
    pub requested_on: NaiveDate,
    /// Copy currently set aside for this reservation
    pub ready_item: Option<ItemId>,
}

impl Reservation {
    pub fn is_waiting(&self) -> bool {
        self.ready_item.is_none()
    }
}

/// Per-book FIFO reservation queues
pub struct ReservationQueue {
    queues: HashMap<Isbn, VecDeque<Reservation>>,
}

impl ReservationQueue {
    pub fn new() -> Self {
        ReservationQueue {
            queues: HashMap::new(),
        }
    }

    /// Append a reservation to the book's queue
    ///
    /// # Returns
    ///
    /// The 1-based position of the new reservation.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReservation` if the member is already queued for the book.
    pub fn enqueue(
        &mut self,
        isbn: &str,
        member: &str,
        requested_on: NaiveDate,
    ) -> Result<usize, LibraryError> {
        if self.contains(isbn, member) {
            return Err(LibraryError::duplicate_reservation(isbn, member));
        }

        let queue = self.queues.entry(isbn.to_string()).or_default();
        queue.push_back(Reservation {
            isbn: isbn.to_string(),
            member: member.to_string(),
            requested_on,
            ready_item: None,
        });
        Ok(queue.len())
    }

    /// Remove and return the earliest reservation for a book
    pub fn dequeue_head(&mut self, isbn: &str) -> Option<Reservation> {
        let queue = self.queues.get_mut(isbn)?;
        let head = queue.pop_front();
        self.discard_if_empty(isbn);
        head
    }

    pub fn peek_head(&self, isbn: &str) -> Option<&Reservation> {
        self.queues.get(isbn).and_then(|queue| queue.front())
    }

    pub fn contains(&self, isbn: &str, member: &str) -> bool {
        self.position(isbn, member).is_some()
    }

    /// 1-based position of a member in a book's queue
    pub fn position(&self, isbn: &str, member: &str) -> Option<usize> {
        self.queues
            .get(isbn)?
            .iter()
            .position(|r| r.member == member)
            .map(|index| index + 1)
    }

    pub fn len(&self, isbn: &str) -> usize {
        self.queues.get(isbn).map_or(0, VecDeque::len)
    }

    /// Total number of reservations across all books
    pub fn total(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Whether any reservation for the book is still without a copy
    pub fn waiting(&self, isbn: &str) -> bool {
        self.queues
            .get(isbn)
            .is_some_and(|queue| queue.iter().any(Reservation::is_waiting))
    }

    /// Reservations for a book in queue order
    pub fn entries(&self, isbn: &str) -> impl Iterator<Item = &Reservation> {
        self.queues.get(isbn).into_iter().flatten()
    }

    /// Every reservation, grouped by book
    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.queues.values().flatten()
    }

    /// Set a copy aside for the earliest waiting reservation
    ///
    /// # Returns
    ///
    /// The member the copy is now held for, or `None` if nobody is waiting.
    pub fn assign_next(&mut self, isbn: &str, item: &str) -> Option<MemberId> {
        let reservation = self
            .queues
            .get_mut(isbn)?
            .iter_mut()
            .find(|r| r.is_waiting())?;
        reservation.ready_item = Some(item.to_string());
        Some(reservation.member.clone())
    }

    /// Put the reservation holding `item` back into the waiting state
    ///
    /// Used when a set-aside copy disappears (reported lost).
    pub fn release(&mut self, isbn: &str, item: &str) -> Option<MemberId> {
        let reservation = self
            .queues
            .get_mut(isbn)?
            .iter_mut()
            .find(|r| r.ready_item.as_deref() == Some(item))?;
        reservation.ready_item = None;
        Some(reservation.member.clone())
    }

    /// Remove the member's reservation once they have checked the copy out
    pub fn fulfil(&mut self, isbn: &str, member: &str) -> Option<Reservation> {
        let index = self.position(isbn, member)? - 1;
        let reservation = if index == 0 {
            self.queues.get_mut(isbn)?.pop_front()
        } else {
            self.queues.get_mut(isbn)?.remove(index)
        };
        self.discard_if_empty(isbn);
        reservation
    }

    /// Drop every reservation for a book
    ///
    /// # Returns
    ///
    /// Number of reservations dropped.
    pub fn drop_book(&mut self, isbn: &str) -> usize {
        self.queues.remove(isbn).map_or(0, |queue| queue.len())
    }

    fn discard_if_empty(&mut self, isbn: &str) {
        if self.queues.get(isbn).is_some_and(VecDeque::is_empty) {
            self.queues.remove(isbn);
        }
    }
}

impl Default for ReservationQueue {
    fn default() -> Self {
        Self::new()
    }
}
