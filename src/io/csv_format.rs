//! CSV format handling for account seeds, transfer requests and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserialization
//! - Conversion from CSV records to domain types
//! - Ledger output serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Account, TransferRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Maximum number of fractional digits the ledger accepts and prints
pub const LEDGER_SCALE: u32 = 4;

/// Account seed row: `id,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvAccountRecord {
    pub id: String,
    pub balance: String,
}

/// Transfer request row: `from,to,amount`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvTransferRecord {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Parse a decimal field without losing precision
///
/// Accepts at most `LEDGER_SCALE` fractional digits. The sign is not checked
/// here; non-positive transfer amounts are rejected by the orchestrator.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("missing amount".to_string());
    }

    let amount =
        Decimal::from_str(trimmed).map_err(|_| format!("Invalid amount '{}'", raw))?;

    if amount.scale() > LEDGER_SCALE {
        return Err(format!(
            "Amount '{}' has more than {} decimal places",
            raw, LEDGER_SCALE
        ));
    }

    Ok(amount)
}

fn parse_id(raw: &str, field: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("Empty {} account id", field));
    }
    Ok(trimmed.to_string())
}

/// Convert an account seed row into an Account
pub fn convert_account_record(record: CsvAccountRecord) -> Result<Account, String> {
    let id = parse_id(&record.id, "seed")?;
    let balance = parse_amount(&record.balance)
        .map_err(|e| format!("{} for account {}", e, id))?;

    Ok(Account::with_balance(id, balance))
}

/// Convert a transfer row into a TransferRequest
///
/// # Returns
///
/// Result containing either:
/// - Ok(TransferRequest) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_transfer_record(record: CsvTransferRecord) -> Result<TransferRequest, String> {
    let from = parse_id(&record.from, "source")?;
    let to = parse_id(&record.to, "destination")?;
    let amount = parse_amount(&record.amount)
        .map_err(|e| format!("{} for transfer {} -> {}", e, from, to))?;

    Ok(TransferRequest::new(from, to, amount))
}

/// Write the ledger in CSV format
///
/// Writes accounts with columns: id, balance. Accounts are sorted by id for
/// deterministic output and balances are printed with `LEDGER_SCALE` digits.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                format!("{:.*}", LEDGER_SCALE as usize, account.balance),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountId;
    use rstest::rstest;

    #[rstest]
    #[case("100", Decimal::new(100, 0))]
    #[case("  100.0  ", Decimal::new(1000, 1))] // whitespace trimming
    #[case("100.1234", Decimal::new(1001234, 4))] // four decimal places
    #[case("-5.50", Decimal::new(-550, 2))] // sign is the orchestrator's concern
    fn test_parse_amount_valid(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", "missing amount")]
    #[case::whitespace("   ", "missing amount")]
    #[case::not_a_number("abc", "Invalid amount")]
    #[case::too_precise("1.00001", "more than 4 decimal places")]
    fn test_parse_amount_errors(#[case] raw: &str, #[case] expected_error: &str) {
        let result = parse_amount(raw);
        assert!(result.unwrap_err().contains(expected_error));
    }

    #[test]
    fn test_convert_transfer_record_valid() {
        let record = CsvTransferRecord {
            from: "1".to_string(),
            to: "2".to_string(),
            amount: "100.00".to_string(),
        };

        let request = convert_transfer_record(record).unwrap();

        assert_eq!(request.from, AccountId::new("1"));
        assert_eq!(request.to, AccountId::new("2"));
        assert_eq!(request.amount, Decimal::new(10000, 2));
    }

    #[rstest]
    #[case::empty_source("", "2", "1", "Empty source account id")]
    #[case::empty_destination("1", " ", "1", "Empty destination account id")]
    #[case::bad_amount("1", "2", "ten", "Invalid amount 'ten' for transfer 1 -> 2")]
    fn test_convert_transfer_record_errors(
        #[case] from: &str,
        #[case] to: &str,
        #[case] amount: &str,
        #[case] expected_error: &str,
    ) {
        let record = CsvTransferRecord {
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
        };

        let result = convert_transfer_record(record);
        assert!(result.unwrap_err().contains(expected_error));
    }

    #[test]
    fn test_convert_account_record_allows_negative_opening_balance() {
        let record = CsvAccountRecord {
            id: "overdrawn".to_string(),
            balance: "-25.00".to_string(),
        };

        let account = convert_account_record(record).unwrap();

        assert_eq!(account.balance, Decimal::new(-2500, 2));
    }

    #[test]
    fn test_convert_account_record_rejects_bad_balance() {
        let record = CsvAccountRecord {
            id: "1".to_string(),
            balance: "lots".to_string(),
        };

        let result = convert_account_record(record);
        assert_eq!(result.unwrap_err(), "Invalid amount 'lots' for account 1");
    }

    #[rstest]
    #[case::sorted_by_id(
        vec![
            Account::with_balance("2", Decimal::new(150000, 2)),
            Account::with_balance("1", Decimal::new(20000, 2)),
        ],
        "id,balance\n1,200.0000\n2,1500.0000\n"
    )]
    #[case::lexical_order(
        vec![
            Account::with_balance("b", Decimal::ZERO),
            Account::with_balance("10", Decimal::ONE),
            Account::with_balance("9", Decimal::TEN),
        ],
        "id,balance\n10,1.0000\n9,10.0000\nb,0.0000\n"
    )]
    #[case::four_decimal_precision(
        vec![Account::with_balance("x", Decimal::new(1001234, 4))],
        "id,balance\nx,100.1234\n"
    )]
    #[case::negative_balance(
        vec![Account::with_balance("x", Decimal::new(-5, 0))],
        "id,balance\nx,-5.0000\n"
    )]
    #[case::empty_accounts(vec![], "id,balance\n")]
    fn test_write_accounts_csv(#[case] accounts: Vec<Account>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        let result = write_accounts_csv(&accounts, &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, expected_output);
    }

    #[test]
    fn test_written_balance_precision_matches_parse_limit() {
        let finest = parse_amount("0.0001").unwrap();
        let mut output = Vec::new();

        write_accounts_csv(&[Account::with_balance("a", finest)], &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let printed = output_str.lines().nth(1).unwrap().split(',').nth(1).unwrap();
        assert_eq!(printed, "0.0001");
        assert_eq!(
            printed.split('.').nth(1).unwrap().len(),
            LEDGER_SCALE as usize
        );
    }
}
