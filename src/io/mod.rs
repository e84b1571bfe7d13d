//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `reader` - Streaming CSV reader with iterator interface

pub mod csv_format;
pub mod reader;

pub use csv_format::{
    convert_event_record, write_books_csv, write_fines_csv, write_members_csv, write_stats_csv,
    BookRecord, CsvRow, EventRecord, ItemRecord, MemberRecord,
};
pub use reader::CsvReader;
