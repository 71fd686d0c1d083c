use crate::core::{NotificationPolicy, TransferConfig};
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Apply concurrent fund transfers to an in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "transfer-engine")]
#[command(about = "Apply concurrent fund transfers to an in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Account seed CSV (`id,balance`)
    #[arg(value_name = "ACCOUNTS", help = "Path to the account seed CSV file")]
    pub accounts_file: PathBuf,

    /// Transfer request CSV (`from,to,amount`)
    #[arg(value_name = "TRANSFERS", help = "Path to the transfer CSV file")]
    pub transfers_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent"
    )]
    pub strategy: StrategyType,

    /// Number of transfers per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfers per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of threads executing transfers (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Bound on each account lock acquisition
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MS",
        help = "Fail a transfer if an account lock is not acquired within MS milliseconds"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// What a failed notification means for the transfer outcome
    #[arg(
        long = "notification-policy",
        value_name = "POLICY",
        default_value = "warn",
        help = "'warn' logs notification failures, 'fail' reports them as transfer errors"
    )]
    pub notification_policy: NotificationPolicyArg,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NotificationPolicyArg {
    Warn,
    Fail,
}

impl From<NotificationPolicyArg> for NotificationPolicy {
    fn from(arg: NotificationPolicyArg) -> Self {
        match arg {
            NotificationPolicyArg::Warn => NotificationPolicy::Warn,
            NotificationPolicyArg::Fail => NotificationPolicy::Fail,
        }
    }
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.workers),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the TransferConfig from CLI arguments
    pub fn to_transfer_config(&self) -> TransferConfig {
        let config = TransferConfig::default()
            .with_notification_policy(self.notification_policy.into());

        match self.lock_timeout_ms {
            Some(ms) => config.with_lock_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }
}
