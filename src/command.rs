use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::credential::Pin;

/// Which money movement an amount belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountAction {
    Deposit,
    Withdraw,
}

impl fmt::Display for AmountAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountAction::Deposit => f.write_str("deposit"),
            AmountAction::Withdraw => f.write_str("withdrawal"),
        }
    }
}

/// Everything that changes the account, including the audited balance read.
#[derive(Debug, Clone)]
pub enum AccountCommand {
    Deposit { amount: Decimal },
    Withdraw { amount: Decimal, pin: Pin },
    ChangePin { old_pin: Pin, new_pin: Pin },
    CheckBalance { pin: Pin },
}

#[derive(Debug, Clone)]
pub enum Request {
    Execute(AccountCommand),
    /// Read only, leaves no trace in the history.
    ViewHistory { pin: Pin },
}

impl From<AccountCommand> for Request {
    fn from(command: AccountCommand) -> Self {
        Self::Execute(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CheckBalance,
    Withdraw,
    Deposit,
    ChangePin,
    ViewHistory,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::CheckBalance,
        MenuChoice::Withdraw,
        MenuChoice::Deposit,
        MenuChoice::ChangePin,
        MenuChoice::ViewHistory,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::CheckBalance => 1,
            MenuChoice::Withdraw => 2,
            MenuChoice::Deposit => 3,
            MenuChoice::ChangePin => 4,
            MenuChoice::ViewHistory => 5,
            MenuChoice::Exit => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::CheckBalance => "Check Balance",
            MenuChoice::Withdraw => "Withdraw Cash",
            MenuChoice::Deposit => "Deposit Cash",
            MenuChoice::ChangePin => "Change PIN",
            MenuChoice::ViewHistory => "View Transaction History",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = AccountCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        input
            .parse::<u8>()
            .ok()
            .and_then(|number| Self::ALL.into_iter().find(|c| c.number() == number))
            .ok_or_else(|| AccountCommandError::UnknownOption(input.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountCommandError {
    #[error("Invalid option `{0}`. Please try again.")]
    UnknownOption(String),
    #[error("`{input}` is not a valid {action} amount")]
    MalformedAmount { action: AmountAction, input: String },
    #[error("The {action} amount {amount} has more than two decimal places")]
    ExcessPrecision { action: AmountAction, amount: Decimal },
    #[error("Column `{column}` is required for `{op}`")]
    MissingField {
        op: &'static str,
        column: &'static str,
    },
}

/// Parses a money amount typed by the user. Sign is left to the account to
/// judge, so `-5` parses fine and gets rejected there. Digit separators such
/// as `1_000` are not plain decimals and are refused.
pub fn parse_amount(input: &str, action: AmountAction) -> Result<Decimal, AccountCommandError> {
    let input = input.trim();
    let malformed = || AccountCommandError::MalformedAmount {
        action,
        input: input.to_string(),
    };
    if input.contains('_') {
        return Err(malformed());
    }
    let amount = input.parse::<Decimal>().map_err(|_| malformed())?;
    if amount.normalize().scale() > 2 {
        return Err(AccountCommandError::ExcessPrecision { action, amount });
    }
    Ok(amount)
}
