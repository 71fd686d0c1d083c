//! Transfer-related types for the transfer engine
//!
//! This module defines the request consumed by the transfer orchestrator and
//! the receipt it hands back once a transfer has been committed.

use super::account::AccountId;
use super::error::LedgerError;
use rust_decimal::Decimal;

/// Request to move `amount` from one account to another
///
/// A value object with no identity of its own. Source and destination may be
/// the same account.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Account to debit
    pub from: AccountId,

    /// Account to credit
    pub to: AccountId,

    /// Amount to move (exact decimal, must be greater than zero)
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(from: impl Into<AccountId>, to: impl Into<AccountId>, amount: Decimal) -> Self {
        TransferRequest {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// Check the request before any lock is taken
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if the amount is zero or negative.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(self.amount));
        }
        Ok(())
    }

    /// Whether source and destination name the same account
    pub fn is_self_transfer(&self) -> bool {
        self.from == self.to
    }
}

/// Outcome of the best-effort notification sent after a commit
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationStatus {
    /// The notifier accepted the message
    Delivered,

    /// The notifier reported a failure; balances stay committed
    Failed(String),
}

/// Result of a committed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Decimal,

    /// Source balance after the commit
    pub from_balance: Decimal,

    /// Destination balance after the commit
    pub to_balance: Decimal,

    pub notification: NotificationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::positive(Decimal::new(10000, 2), true)]
    #[case::smallest_unit(Decimal::new(1, 4), true)]
    #[case::zero(Decimal::ZERO, false)]
    #[case::negative(Decimal::new(-500, 2), false)]
    fn test_validate_amount(#[case] amount: Decimal, #[case] valid: bool) {
        let request = TransferRequest::new("1", "2", amount);

        assert_eq!(request.validate().is_ok(), valid);
        if !valid {
            assert_eq!(
                request.validate().unwrap_err(),
                LedgerError::invalid_amount(amount)
            );
        }
    }

    #[test]
    fn test_is_self_transfer() {
        assert!(TransferRequest::new("A", "A", Decimal::ONE).is_self_transfer());
        assert!(!TransferRequest::new("A", "B", Decimal::ONE).is_self_transfer());
    }
}
