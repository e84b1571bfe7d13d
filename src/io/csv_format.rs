//! CSV format handling for inventory, event logs and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserializing books, items, members and events
//! - Conversion from CSV records to domain types
//! - Report serialization (members, stats, books, fines)
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::{CatalogStats, LibraryPolicy};
use crate::types::{Book, BookItem, Fine, LibraryError, LibraryEvent, Member};
use chrono::NaiveDate;
use csv::Writer;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;

/// Date format used in every CSV file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A CSV row that converts into a domain value
///
/// Implemented by every input record type so one reader can stream any of
/// the input files.
pub trait CsvRow: DeserializeOwned {
    type Output;

    /// Validate the raw row and build the domain value
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    fn convert(self) -> Result<Self::Output, String>;
}

/// Row of the books file: `isbn,title,author,subject,published`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BookRecord {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub published: String,
}

/// Row of the items file: `item,isbn,rack`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ItemRecord {
    pub item: String,
    pub isbn: String,
    pub rack: String,
}

/// Row of the members file: `member,name,contact`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MemberRecord {
    pub member: String,
    pub name: String,
    pub contact: String,
}

/// Row of the events file: `type,date,item,member,isbn`
///
/// Only the columns the event type needs have to be filled in; the others
/// may be empty or missing.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: String,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}' (expected YYYY-MM-DD)", value))
}

fn non_empty(value: &str, field: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("Missing {}", field));
    }
    Ok(value.to_string())
}

fn required(value: Option<String>, field: &str, event_type: &str) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(format!("{} event requires {}", event_type, field)),
    }
}

impl CsvRow for BookRecord {
    type Output = Book;

    fn convert(self) -> Result<Book, String> {
        let isbn = non_empty(&self.isbn, "isbn")?;
        let published = parse_date(&self.published)?;
        Ok(Book::new(isbn, self.title, self.author, self.subject, published))
    }
}

impl CsvRow for ItemRecord {
    type Output = BookItem;

    fn convert(self) -> Result<BookItem, String> {
        let item = non_empty(&self.item, "item")?;
        let isbn = non_empty(&self.isbn, "isbn")?;
        Ok(BookItem::new(item, isbn, self.rack))
    }
}

impl CsvRow for MemberRecord {
    type Output = Member;

    fn convert(self) -> Result<Member, String> {
        let member = non_empty(&self.member, "member")?;
        Ok(Member::new(member, self.name, self.contact))
    }
}

impl CsvRow for EventRecord {
    type Output = LibraryEvent;

    fn convert(self) -> Result<LibraryEvent, String> {
        convert_event_record(self)
    }
}

/// Convert an EventRecord to a LibraryEvent
///
/// This function:
/// - Parses the event type (case-insensitive)
/// - Parses the event date
/// - Validates that the identifiers the event type needs are present
///
/// Identifiers the event type does not use are ignored.
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(LibraryEvent) - Successfully converted event
/// - Err(String) - Error message describing the conversion failure
pub fn convert_event_record(record: EventRecord) -> Result<LibraryEvent, String> {
    let kind = record.event_type.trim().to_lowercase();
    let on = parse_date(&record.date)?;

    let event = match kind.as_str() {
        "checkout" => LibraryEvent::Checkout {
            item: required(record.item, "an item", &kind)?,
            member: required(record.member, "a member", &kind)?,
            on,
        },
        "return" => LibraryEvent::Return {
            item: required(record.item, "an item", &kind)?,
            on,
        },
        "reserve" => LibraryEvent::Reserve {
            isbn: required(record.isbn, "an isbn", &kind)?,
            member: required(record.member, "a member", &kind)?,
            on,
        },
        "lost" => LibraryEvent::Lost {
            item: required(record.item, "an item", &kind)?,
            on,
        },
        "remind" => LibraryEvent::Remind { on },
        "remove" => LibraryEvent::Remove {
            isbn: required(record.isbn, "an isbn", &kind)?,
            on,
        },
        _ => return Err(format!("Invalid event type: '{}'", record.event_type)),
    };

    Ok(event)
}

/// Write the member report
///
/// Columns: member, name, held, outstanding, can_checkout. Members are
/// written in the order given; the catalog hands them over sorted by ID.
/// `can_checkout` is true when the member is under the holding limit and
/// not blocked by fines.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_members_csv(
    members: &[&Member],
    policy: &LibraryPolicy,
    output: &mut dyn Write,
) -> Result<(), LibraryError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["member", "name", "held", "outstanding", "can_checkout"])?;

    for member in members {
        let can_checkout = member.held_count() < policy.max_books_per_member
            && policy.can_checkout(member.outstanding);
        writer.write_record(&[
            member.id.clone(),
            member.name.clone(),
            member.held_count().to_string(),
            format!("{:.2}", member.outstanding),
            can_checkout.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the statistics report as a single row
pub fn write_stats_csv(stats: &CatalogStats, output: &mut dyn Write) -> Result<(), LibraryError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record([
        "books",
        "items",
        "members",
        "available",
        "checked_out",
        "reserved",
        "lost",
        "reservations",
    ])?;
    writer.write_record(&[
        stats.total_books.to_string(),
        stats.total_items.to_string(),
        stats.total_members.to_string(),
        stats.available.to_string(),
        stats.checked_out.to_string(),
        stats.reserved.to_string(),
        stats.lost.to_string(),
        stats.reservations.to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}

/// Write the book report
///
/// Each entry pairs a book with the number of its copies on the shelf.
pub fn write_books_csv(
    books: &[(&Book, usize)],
    output: &mut dyn Write,
) -> Result<(), LibraryError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["isbn", "title", "author", "subject", "published", "available"])?;

    for (book, available) in books {
        writer.write_record(&[
            book.isbn.clone(),
            book.title.clone(),
            book.author.clone(),
            book.subject.clone(),
            book.published.format(DATE_FORMAT).to_string(),
            available.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the fine ledger in assessment order
pub fn write_fines_csv(fines: &[Fine], output: &mut dyn Write) -> Result<(), LibraryError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["member", "item", "amount", "assessed"])?;

    for fine in fines {
        writer.write_record(&[
            fine.member.clone(),
            fine.item.clone(),
            format!("{:.2}", fine.amount),
            fine.assessed_on.format(DATE_FORMAT).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
