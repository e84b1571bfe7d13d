//! Replay session
//!
//! This module drives a complete batch run: it stocks a [`LibraryCatalog`]
//! from the inventory CSV files, replays an event log through it, and writes
//! the requested report.
//!
//! # Design
//!
//! The ReplaySession focuses on orchestration, delegating:
//! - CSV parsing to `CsvReader` (iterator interface)
//! - Lifecycle rules to `LibraryCatalog`
//! - Report output to the `csv_format` writers
//!
//! # Error Handling
//!
//! Fatal errors (missing files, unwritable output) are returned immediately.
//! Inventory rows and events that fail to parse or that the catalog rejects
//! are logged with `tracing::warn!`, counted, and skipped.

use crate::cli::{CliArgs, Report};
use crate::core::{LibraryCatalog, LibraryPolicy, LogNotifier, Notifier, SearchQuery};
use crate::io::csv_format::{
    write_books_csv, write_fines_csv, write_members_csv, write_stats_csv, BookRecord, CsvRow,
    EventRecord, ItemRecord, MemberRecord,
};
use crate::io::CsvReader;
use crate::types::{Book, LibraryError};
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Inventory files loaded before the replay
#[derive(Debug, Clone)]
pub struct Inventory {
    pub books: PathBuf,
    pub items: PathBuf,
    pub members: PathBuf,
}

impl From<&CliArgs> for Inventory {
    fn from(args: &CliArgs) -> Self {
        Inventory {
            books: args.books.clone(),
            items: args.items.clone(),
            members: args.members.clone(),
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Inventory rows added to the catalog
    pub loaded: usize,
    /// Rows that could not be parsed (inventory and events)
    pub skipped: usize,
    /// Events the catalog accepted
    pub applied: usize,
    /// Inventory rows and events the catalog refused
    pub rejected: usize,
}

/// A catalog plus the bookkeeping of one replay run
pub struct ReplaySession<N: Notifier = LogNotifier> {
    catalog: LibraryCatalog<N>,
    summary: ReplaySummary,
}

impl<N: Notifier> ReplaySession<N> {
    pub fn new(policy: LibraryPolicy, notifier: N) -> Self {
        ReplaySession {
            catalog: LibraryCatalog::new(policy, notifier),
            summary: ReplaySummary::default(),
        }
    }

    pub fn catalog(&self) -> &LibraryCatalog<N> {
        &self.catalog
    }

    pub fn summary(&self) -> ReplaySummary {
        self.summary
    }

    /// Stock the catalog from the inventory files
    ///
    /// Books are loaded first, then items (which refer to books), then
    /// members.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the files cannot be opened.
    pub fn load_inventory(&mut self, inventory: &Inventory) -> Result<(), LibraryError> {
        self.load::<BookRecord, _>(&inventory.books, |catalog, book| catalog.add_book(book))?;
        // Nobody has reserved anything yet, so the stocking date is never recorded
        self.load::<ItemRecord, _>(&inventory.items, |catalog, item| {
            catalog.add_item(item, NaiveDate::MIN)
        })?;
        self.load::<MemberRecord, _>(&inventory.members, |catalog, member| {
            catalog.add_member(member)
        })?;

        tracing::info!(
            books = self.catalog.books().count(),
            items = self.catalog.items().count(),
            members = self.catalog.members().len(),
            "inventory loaded"
        );
        Ok(())
    }

    fn load<T, F>(&mut self, path: &Path, mut add: F) -> Result<(), LibraryError>
    where
        T: CsvRow,
        F: FnMut(&mut LibraryCatalog<N>, T::Output) -> Result<(), LibraryError>,
    {
        for result in CsvReader::<T>::open(path)? {
            match result {
                Ok(value) => match add(&mut self.catalog, value) {
                    Ok(()) => self.summary.loaded += 1,
                    Err(e) => {
                        self.summary.rejected += 1;
                        tracing::warn!(file = %path.display(), error = %e, "inventory row rejected");
                    }
                },
                Err(e) => {
                    self.summary.skipped += 1;
                    tracing::warn!(file = %path.display(), error = %e, "inventory row skipped");
                }
            }
        }
        Ok(())
    }

    /// Replay an event log through the catalog, in file order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn replay(&mut self, events: &Path) -> Result<(), LibraryError> {
        for result in CsvReader::<EventRecord>::open(events)? {
            match result {
                Ok(event) => {
                    let event_type = event.event_type();
                    let on = event.date();
                    match self.catalog.apply(event) {
                        Ok(()) => self.summary.applied += 1,
                        Err(e) => {
                            self.summary.rejected += 1;
                            tracing::warn!(event = ?event_type, %on, error = %e, "event rejected");
                        }
                    }
                }
                Err(e) => {
                    self.summary.skipped += 1;
                    tracing::warn!(error = %e, "event row skipped");
                }
            }
        }
        Ok(())
    }

    /// Write a report of the current catalog state
    ///
    /// `search` narrows the books report to matching books; other reports
    /// ignore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_report(
        &self,
        report: Report,
        search: Option<&SearchQuery>,
        output: &mut dyn Write,
    ) -> Result<(), LibraryError> {
        match report {
            Report::Members => {
                write_members_csv(&self.catalog.members(), self.catalog.policy(), output)
            }
            Report::Stats => write_stats_csv(&self.catalog.stats(), output),
            Report::Books => {
                let books: Vec<&Book> = match search {
                    Some(query) => self.catalog.search(query),
                    None => self.catalog.books().collect(),
                };
                let rows: Vec<(&Book, usize)> = books
                    .into_iter()
                    .map(|book| (book, self.catalog.available_items(&book.isbn).len()))
                    .collect();
                write_books_csv(&rows, output)
            }
            Report::Fines => write_fines_csv(self.catalog.fines(), output),
        }
    }
}

/// Run the whole pipeline for parsed CLI arguments
///
/// # Errors
///
/// Returns an error if:
/// - The search date is malformed
/// - An input file cannot be opened
/// - The report cannot be written
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<ReplaySummary, LibraryError> {
    let search = args.search_query()?;
    if search.is_some() && args.report != Report::Books {
        tracing::warn!(report = ?args.report, "search only applies to the books report; ignoring it");
    }

    let mut session = ReplaySession::new(args.to_policy(), LogNotifier);
    session.load_inventory(&Inventory::from(args))?;
    session.replay(&args.events_file)?;
    session.write_report(args.report, search.as_ref(), output)?;

    let summary = session.summary();
    tracing::info!(
        loaded = summary.loaded,
        applied = summary.applied,
        rejected = summary.rejected,
        skipped = summary.skipped,
        "replay finished"
    );
    Ok(summary)
}
