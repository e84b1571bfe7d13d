//! Lending policy
//!
//! Holds the configuration constants of the lifecycle: how many copies a
//! member may hold, how long a loan lasts, what a late day costs, and the
//! balance above which a member may no longer borrow.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

/// Lending policy configuration
#[derive(Clone, Debug, PartialEq)]
pub struct LibraryPolicy {
    /// Maximum number of copies a member may hold at once
    pub max_books_per_member: usize,
    /// Length of a loan in days
    pub loan_period_days: u32,
    /// Fine charged per day late
    pub daily_fine_rate: Decimal,
    /// Outstanding balance above which checkouts are refused
    pub fine_block_threshold: Decimal,
}

impl Default for LibraryPolicy {
    fn default() -> Self {
        Self {
            max_books_per_member: 5,
            loan_period_days: 14,
            daily_fine_rate: Decimal::new(50, 2),
            fine_block_threshold: Decimal::new(1000, 2),
        }
    }
}

impl LibraryPolicy {
    /// Create a policy with custom values
    ///
    /// Zero limits and negative amounts make no sense for a lending policy;
    /// they are replaced by the defaults with a warning.
    pub fn new(
        max_books_per_member: usize,
        loan_period_days: u32,
        daily_fine_rate: Decimal,
        fine_block_threshold: Decimal,
    ) -> Self {
        let default = Self::default();

        let max_books_per_member = if max_books_per_member == 0 {
            tracing::warn!(
                value = max_books_per_member,
                default = default.max_books_per_member,
                "invalid max_books_per_member, using default"
            );
            default.max_books_per_member
        } else {
            max_books_per_member
        };

        let loan_period_days = if loan_period_days == 0 {
            tracing::warn!(
                value = loan_period_days,
                default = default.loan_period_days,
                "invalid loan_period_days, using default"
            );
            default.loan_period_days
        } else {
            loan_period_days
        };

        let daily_fine_rate = if daily_fine_rate.is_sign_negative() {
            tracing::warn!(
                value = %daily_fine_rate,
                default = %default.daily_fine_rate,
                "invalid daily_fine_rate, using default"
            );
            default.daily_fine_rate
        } else {
            daily_fine_rate
        };

        let fine_block_threshold = if fine_block_threshold.is_sign_negative() {
            tracing::warn!(
                value = %fine_block_threshold,
                default = %default.fine_block_threshold,
                "invalid fine_block_threshold, using default"
            );
            default.fine_block_threshold
        } else {
            fine_block_threshold
        };

        Self {
            max_books_per_member,
            loan_period_days,
            daily_fine_rate,
            fine_block_threshold,
        }
    }

    /// Due date of a loan starting on `checked_out_on`
    ///
    /// Returns `None` if the date would leave the supported calendar range.
    pub fn due_date(&self, checked_out_on: NaiveDate) -> Option<NaiveDate> {
        checked_out_on.checked_add_days(Days::new(u64::from(self.loan_period_days)))
    }

    /// Whether a member with this outstanding balance may borrow
    pub fn can_checkout(&self, outstanding: Decimal) -> bool {
        outstanding <= self.fine_block_threshold
    }
}
