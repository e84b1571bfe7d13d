//! Overdue fine computation
//!
//! Fines are computed lazily when a copy comes back; there is no background
//! sweep. The computation is a pure function of the due date, the return date
//! and the daily rate.

use crate::types::LibraryError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Whole days between the due date and `on`, or zero if not late
pub fn days_overdue(due: NaiveDate, on: NaiveDate) -> i64 {
    on.signed_duration_since(due).num_days().max(0)
}

/// Fine owed for returning a copy on `returned` that was due on `due`
///
/// `max(0, days_late) * daily_rate`. Returning on or before the due date
/// costs nothing.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if the product does not fit in a `Decimal`.
pub fn compute_fine(
    due: NaiveDate,
    returned: NaiveDate,
    daily_rate: Decimal,
) -> Result<Decimal, LibraryError> {
    let days = days_overdue(due, returned);
    if days == 0 {
        return Ok(Decimal::ZERO);
    }

    Decimal::from(days)
        .checked_mul(daily_rate)
        .ok_or_else(|| LibraryError::arithmetic_overflow("fine", &format!("{} days late", days)))
}
