use crate::core::{LibraryPolicy, SearchQuery};
use crate::io::csv_format::parse_date;
use crate::types::LibraryError;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Replay library events against an inventory and report the outcome
#[derive(Parser, Debug)]
#[command(name = "library-tracker")]
#[command(about = "Replay library checkout events and report the resulting state", long_about = None)]
pub struct CliArgs {
    /// Event log to replay
    #[arg(value_name = "EVENTS", help = "Path to the events CSV file")]
    pub events_file: PathBuf,

    #[arg(long, value_name = "FILE", help = "Books CSV (isbn,title,author,subject,published)")]
    pub books: PathBuf,

    #[arg(long, value_name = "FILE", help = "Items CSV (item,isbn,rack)")]
    pub items: PathBuf,

    #[arg(long, value_name = "FILE", help = "Members CSV (member,name,contact)")]
    pub members: PathBuf,

    /// Report written to stdout after the replay
    #[arg(long, value_name = "REPORT", default_value = "members")]
    pub report: Report,

    /// Catalog field to search (books report only)
    #[arg(long, value_name = "FIELD", requires = "query")]
    pub field: Option<SearchField>,

    /// Search text, or a YYYY-MM-DD date for `--field date`
    #[arg(long, value_name = "TEXT", requires = "field")]
    pub query: Option<String>,

    #[arg(
        long = "max-books",
        value_name = "COUNT",
        help = "Maximum copies a member may hold (default: 5)"
    )]
    pub max_books: Option<usize>,

    #[arg(
        long = "loan-period-days",
        value_name = "DAYS",
        help = "Length of a loan in days (default: 14)"
    )]
    pub loan_period_days: Option<u32>,

    #[arg(
        long = "daily-fine-rate",
        value_name = "AMOUNT",
        help = "Fine per day late (default: 0.50)"
    )]
    pub daily_fine_rate: Option<Decimal>,

    #[arg(
        long = "fine-block-threshold",
        value_name = "AMOUNT",
        help = "Outstanding fines above which checkouts are refused (default: 10.00)"
    )]
    pub fine_block_threshold: Option<Decimal>,
}

/// Reports available on stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Report {
    Members,
    Stats,
    Books,
    Fines,
}

/// Searchable catalog fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SearchField {
    Title,
    Author,
    Subject,
    Date,
}

impl SearchField {
    /// Build a catalog query for this field
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the field is `date` and the text is not a
    /// `YYYY-MM-DD` date.
    pub fn to_query(self, text: &str) -> Result<SearchQuery, LibraryError> {
        let text = text.trim().to_string();
        Ok(match self {
            SearchField::Title => SearchQuery::Title(text),
            SearchField::Author => SearchQuery::Author(text),
            SearchField::Subject => SearchQuery::Subject(text),
            SearchField::Date => SearchQuery::Published(
                parse_date(&text).map_err(|message| LibraryError::ParseError {
                    line: None,
                    message,
                })?,
            ),
        })
    }
}

impl CliArgs {
    /// Create a LibraryPolicy from CLI arguments
    ///
    /// Flags that were not given take their default values. Invalid values
    /// (zero limits, negative amounts) fall back to the defaults with a
    /// warning.
    pub fn to_policy(&self) -> LibraryPolicy {
        let default = LibraryPolicy::default();

        if self.max_books.is_none()
            && self.loan_period_days.is_none()
            && self.daily_fine_rate.is_none()
            && self.fine_block_threshold.is_none()
        {
            return default;
        }

        LibraryPolicy::new(
            self.max_books.unwrap_or(default.max_books_per_member),
            self.loan_period_days.unwrap_or(default.loan_period_days),
            self.daily_fine_rate.unwrap_or(default.daily_fine_rate),
            self.fine_block_threshold
                .unwrap_or(default.fine_block_threshold),
        )
    }

    /// The catalog search requested with `--field` and `--query`, if any
    pub fn search_query(&self) -> Result<Option<SearchQuery>, LibraryError> {
        match (self.field, &self.query) {
            (Some(field), Some(query)) => field.to_query(query).map(Some),
            _ => Ok(None),
        }
    }
}
