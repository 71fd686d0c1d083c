//! I/O module
//!
//! Handles CSV parsing and output for the command-line driver.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, ledger serialization)
//! - `sync_reader` - Synchronous readers (transfer iterator, account seed loader)
//! - `async_reader` - Asynchronous transfer reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_account_record, convert_transfer_record, write_accounts_csv, CsvAccountRecord,
    CsvTransferRecord, LEDGER_SCALE,
};
pub use sync_reader::{read_accounts, SyncReader};
