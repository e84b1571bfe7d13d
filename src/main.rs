//! Library Checkout Tracker CLI
//!
//! Replays a log of library events against an inventory and reports the
//! resulting state as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --books books.csv --items items.csv --members members.csv events.csv > members_report.csv
//! cargo run -- --books books.csv --items items.csv --members members.csv --report stats events.csv
//! cargo run -- --books books.csv --items items.csv --members members.csv \
//!     --report books --field subject --query programming events.csv
//! cargo run -- --books books.csv --items items.csv --members members.csv \
//!     --max-books 3 --daily-fine-rate 0.25 --report fines events.csv
//! ```
//!
//! Logs (rejected events, notifications) go to stderr; set `RUST_LOG` to
//! change their verbosity.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output not writable, etc.)

use library_tracker::{cli, replay, telemetry};
use std::process;

fn main() {
    telemetry::setup_tracing();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = replay::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
