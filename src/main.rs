//! Rust Transfer Engine CLI
//!
//! Seeds an in-memory ledger from a CSV file, applies transfer requests from
//! a second CSV file and prints the resulting ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.csv transfers.csv > ledger.csv
//! cargo run -- --strategy sync accounts.csv transfers.csv > ledger.csv
//! cargo run -- --strategy async --workers 8 --lock-timeout-ms 500 accounts.csv transfers.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_transfer_engine::{cli, logging, strategy};
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init_logging(&args.log_level);

    let strategy = {
        let batch_config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), batch_config, args.to_transfer_config())
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.accounts_file, &args.transfers_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
