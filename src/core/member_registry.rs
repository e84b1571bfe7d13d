//! Member management module
//!
//! This module provides the `MemberRegistry` struct which maintains the state
//! of all registered members.
//!
//! The MemberRegistry is responsible for:
//! - Registering members and rejecting duplicate IDs
//! - Tracking which copies each member holds
//! - Accumulating outstanding fines with checked arithmetic
//! - Deciding whether a member may borrow under the lending policy

use crate::core::policy::LibraryPolicy;
use crate::types::{LibraryError, Member, MemberId};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Manages all members and their borrowing state
pub struct MemberRegistry {
    /// Map of member IDs to member states
    members: HashMap<MemberId, Member>,
}

impl MemberRegistry {
    /// Create a new MemberRegistry with no members
    pub fn new() -> Self {
        MemberRegistry {
            members: HashMap::new(),
        }
    }

    /// Register a new member
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMember` if the ID is already registered.
    pub fn register(&mut self, member: Member) -> Result<(), LibraryError> {
        if self.members.contains_key(&member.id) {
            return Err(LibraryError::DuplicateMember { member: member.id });
        }
        self.members.insert(member.id.clone(), member);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// Look up a member, failing with `NotFound` if unknown
    pub fn require(&self, id: &str) -> Result<&Member, LibraryError> {
        self.members
            .get(id)
            .ok_or_else(|| LibraryError::member_not_found(id))
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Member, LibraryError> {
        self.members
            .get_mut(id)
            .ok_or_else(|| LibraryError::member_not_found(id))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Get all members sorted by member ID
    ///
    /// Sorting keeps report output deterministic.
    pub fn all_members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        members
    }

    /// Check that a member may take one more copy
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The member is unknown (`NotFound`)
    /// - The member already holds the policy maximum (`CheckoutLimitExceeded`)
    /// - The member's outstanding fines exceed the threshold (`MemberBlocked`)
    pub fn ensure_can_borrow(&self, id: &str, policy: &LibraryPolicy) -> Result<(), LibraryError> {
        let member = self.require(id)?;

        if member.held_count() >= policy.max_books_per_member {
            return Err(LibraryError::checkout_limit_exceeded(
                id,
                member.held_count(),
                policy.max_books_per_member,
            ));
        }

        if !policy.can_checkout(member.outstanding) {
            return Err(LibraryError::member_blocked(
                id,
                member.outstanding,
                policy.fine_block_threshold,
            ));
        }

        Ok(())
    }

    /// Record that a member now holds an item
    pub fn attach_item(&mut self, id: &str, item: &str) -> Result<(), LibraryError> {
        let member = self.require_mut(id)?;
        member.held.insert(item.to_string());
        Ok(())
    }

    /// Record that a member no longer holds an item
    pub fn detach_item(&mut self, id: &str, item: &str) -> Result<(), LibraryError> {
        let member = self.require_mut(id)?;
        member.held.remove(item);
        Ok(())
    }

    /// Balance the member would have after being charged `amount`
    ///
    /// Does not modify the member; callers validate with this before mutating
    /// any other state, then commit with [`MemberRegistry::set_outstanding`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown member and `ArithmeticOverflow` if
    /// the balance would overflow.
    pub fn balance_after_fine(&self, id: &str, amount: Decimal) -> Result<Decimal, LibraryError> {
        let member = self.require(id)?;
        member
            .outstanding
            .checked_add(amount)
            .ok_or_else(|| LibraryError::arithmetic_overflow("fine", id))
    }

    pub fn set_outstanding(&mut self, id: &str, balance: Decimal) -> Result<(), LibraryError> {
        let member = self.require_mut(id)?;
        member.outstanding = balance;
        Ok(())
    }

    /// Add a fine to a member's outstanding balance
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown member and `ArithmeticOverflow` if
    /// the balance would overflow. The balance is unchanged on error.
    pub fn charge_fine(&mut self, id: &str, amount: Decimal) -> Result<Decimal, LibraryError> {
        let balance = self.balance_after_fine(id, amount)?;
        self.set_outstanding(id, balance)?;
        Ok(balance)
    }
}

impl Default for MemberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
