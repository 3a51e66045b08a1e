use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    account::{Account, AccountError, Dollars, TransactionRecord},
    command::{AccountCommand, Request},
};

pub mod in_memory_processor;
pub mod shared_processor;

/// What the shell gets back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub message: String,
    pub balance: Option<Decimal>,
    pub records: Option<Vec<TransactionRecord>>,
    pub error: Option<AccountError>,
}

impl Receipt {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    fn ok(message: String) -> Self {
        Self {
            message,
            balance: None,
            records: None,
            error: None,
        }
    }

    fn failed(err: AccountError) -> Self {
        Self {
            message: err.to_string(),
            balance: None,
            records: None,
            error: Some(err),
        }
    }
}

pub trait Teller {
    fn process(&mut self, request: Request) -> Receipt;
}

/// Runs one request against the account. Callers that share the account
/// must hold exclusive access for the whole call.
pub(crate) fn serve(account: &mut Account, request: Request) -> Receipt {
    let result = match request {
        Request::Execute(command) => execute(account, command),
        Request::ViewHistory { pin } => {
            account
                .transaction_history(pin.as_str())
                .map(|records| Receipt {
                    records: Some(records.to_vec()),
                    ..Receipt::ok("Transaction history:".to_string())
                })
        }
    };
    result.unwrap_or_else(|err| {
        debug!(%err, "request rejected");
        Receipt::failed(err)
    })
}

fn execute(account: &mut Account, command: AccountCommand) -> Result<Receipt, AccountError> {
    match command {
        AccountCommand::CheckBalance { pin } => {
            let balance = account.check_balance(pin.as_str())?;
            Ok(Receipt {
                balance: Some(balance),
                ..Receipt::ok(format!("Current balance: {}", Dollars(balance)))
            })
        }
        AccountCommand::ChangePin { .. } => {
            account.execute(command)?;
            Ok(Receipt::ok("PIN changed successfully.".to_string()))
        }
        AccountCommand::Deposit { amount } => {
            account.execute(command)?;
            Ok(Receipt::ok(TransactionRecord::Deposit(amount).to_string()))
        }
        AccountCommand::Withdraw { amount, .. } => {
            account.execute(command)?;
            Ok(Receipt::ok(TransactionRecord::Withdrawal(amount).to_string()))
        }
    }
}
