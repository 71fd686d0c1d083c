//! Notification side channel
//!
//! `LoggingNotifier` delivers transfer notifications as structured tracing
//! events. It never fails, which makes it the default for the CLI driver.

use crate::core::traits::Notifier;
use crate::types::Account;
use tracing::info;

/// Notifier that emits an `info!` event per notification
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify_about_transfer(&self, account: &Account, message: &str) -> Result<(), String> {
        info!(
            account = %account.id,
            balance = %account.balance,
            "{}",
            message
        );
        Ok(())
    }
}
