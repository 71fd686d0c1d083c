//! Synchronous CSV readers
//!
//! Provides a streaming iterator over transfer requests and a loader for the
//! account seed file. Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<TransferRequest, String>` for each CSV row:
//!
//! ```no_run
//! use rust_transfer_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Transfer: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{
    convert_account_record, convert_transfer_record, CsvAccountRecord, CsvTransferRecord,
};
use crate::types::{Account, LedgerError, TransferRequest};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::warn;

/// Describe a failure to open one of the input files
pub(crate) fn open_error(path: &Path, error: io::Error) -> String {
    let cause = if error.kind() == io::ErrorKind::NotFound {
        LedgerError::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        LedgerError::from(error)
    };
    format!("Failed to open file '{}': {}", path.display(), cause)
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, String> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Synchronous transfer CSV reader
///
/// Streams one record at a time with constant memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        Ok(Self {
            reader: open_csv(path)?,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransferRequest, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvTransferRecord>();

        let next = deserializer.next()?;
        self.line_num += 1;
        // +1 for the header row
        let line = self.line_num + 1;

        Some(match next {
            Ok(record) => {
                convert_transfer_record(record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: {}", line, LedgerError::from(e))),
        })
    }
}

/// Load the account seed file
///
/// Invalid rows and duplicate ids are logged and skipped; the first row for
/// an id wins.
///
/// # Errors
///
/// Returns an error only if the file cannot be opened.
pub fn read_accounts(path: &Path) -> Result<Vec<Account>, String> {
    let mut reader = open_csv(path)?;
    let mut seen = std::collections::HashSet::new();
    let mut accounts = Vec::new();

    for (index, row) in reader.deserialize::<CsvAccountRecord>().enumerate() {
        let line = index + 2;
        let account = match row {
            Ok(record) => match convert_account_record(record) {
                Ok(account) => account,
                Err(e) => {
                    warn!(line, error = %e, "Skipping account record");
                    continue;
                }
            },
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed account row");
                continue;
            }
        };

        if !seen.insert(account.id.clone()) {
            warn!(line, account = %account.id, "Skipping duplicate account id");
            continue;
        }
        accounts.push(account);
    }

    Ok(accounts)
}
