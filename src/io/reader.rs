//! Streaming CSV reader with iterator interface
//!
//! Provides a streaming iterator over the rows of any input file (books,
//! items, members or events). Delegates CSV format concerns to the
//! csv_format module.
//!
//! # Design
//!
//! CsvReader uses csv::Reader to deserialize one row at a time into the
//! record type `T`, then converts it with [`CsvRow::convert`]. The whole file
//! is never held in memory.
//!
//! ```no_run
//! use library_tracker::io::csv_format::EventRecord;
//! use library_tracker::io::CsvReader;
//! use std::path::Path;
//!
//! let reader = CsvReader::<EventRecord>::open(Path::new("events.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(event) => println!("Replaying event: {:?}", event),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `open()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::CsvRow;
use crate::types::LibraryError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::Path;

/// Streaming CSV reader
///
/// Yields `Result<T::Output, String>` for each data row.
#[derive(Debug)]
pub struct CsvReader<T> {
    reader: csv::Reader<File>,
    line_num: usize,
    _row: PhantomData<T>,
}

impl<T: CsvRow> CsvReader<T> {
    /// Open a CSV file for streaming iteration
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (event rows may omit unused columns)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist and `IoError` for
    /// any other failure to open it.
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LibraryError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
            _row: PhantomData,
        })
    }
}

impl<T: CsvRow> Iterator for CsvReader<T> {
    type Item = Result<T::Output, String>;

    /// Read, deserialize and convert the next row
    ///
    /// Line numbers in errors count the header as line 1.
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T>();

        let result = deserializer.next()?;
        self.line_num += 1;
        let line = self.line_num + 1;

        Some(match result {
            Ok(record) => record.convert().map_err(|e| format!("Line {}: {}", line, e)),
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
