use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    command::{AccountCommand, AmountAction},
    credential::{Pin, PinDigest},
};

/// One line of the audit trail. Records are appended, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionRecord {
    Deposit(Decimal),
    Withdrawal(Decimal),
    PinChanged,
    BalanceChecked,
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionRecord::Deposit(amount) => write!(f, "Deposited: {}", Dollars(*amount)),
            TransactionRecord::Withdrawal(amount) => write!(f, "Withdrew: {}", Dollars(*amount)),
            TransactionRecord::PinChanged => f.write_str("PIN changed."),
            TransactionRecord::BalanceChecked => f.write_str("Balance checked."),
        }
    }
}

/// Renders an amount as `$1234.50`.
pub struct Dollars(pub Decimal);

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AccountEvent {
    Deposited(Decimal),
    Withdrawn(Decimal),
    PinChanged(PinDigest),
    BalanceChecked,
}

/// Which PIN failed to authenticate, only used for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    Current,
    Old,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinRole::Current => f.write_str("PIN"),
            PinRole::Old => f.write_str("old PIN"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Incorrect {role}")]
    AuthenticationFailed { role: PinRole },
    #[error("Invalid {action} amount: {amount}")]
    InvalidAmount {
        action: AmountAction,
        amount: Decimal,
    },
    #[error("Insufficient balance to withdraw ${requested:.2}")]
    InsufficientFunds { requested: Decimal },
    #[error("Deposit of ${amount:.2} would overflow the balance")]
    BalanceOverflow { amount: Decimal },
    #[error("Opening balance must not be negative, got {0}")]
    NegativeOpeningBalance(Decimal),
}

#[derive(Debug)]
pub struct Account {
    credential: PinDigest,
    balance: Decimal,
    history: Vec<TransactionRecord>,
}

impl Account {
    pub fn new(pin: &str, opening_balance: Decimal) -> Result<Self, AccountError> {
        if opening_balance.is_sign_negative() && !opening_balance.is_zero() {
            return Err(AccountError::NegativeOpeningBalance(opening_balance));
        }
        Ok(Self {
            credential: PinDigest::of(pin),
            balance: opening_balance,
            history: Vec::new(),
        })
    }

    pub fn authenticate(&self, pin: &str) -> bool {
        self.credential.matches(pin)
    }

    pub fn change_pin(&mut self, old_pin: &str, new_pin: &str) -> Result<(), AccountError> {
        self.execute(AccountCommand::ChangePin {
            old_pin: Pin::from(old_pin),
            new_pin: Pin::from(new_pin),
        })
    }

    /// Anyone may deposit, no PIN is asked for.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        self.execute(AccountCommand::Deposit { amount })
    }

    pub fn withdraw(&mut self, amount: Decimal, pin: &str) -> Result<(), AccountError> {
        self.execute(AccountCommand::Withdraw {
            amount,
            pin: Pin::from(pin),
        })
    }

    /// Returns the balance and records the read in the history.
    pub fn check_balance(&mut self, pin: &str) -> Result<Decimal, AccountError> {
        self.execute(AccountCommand::CheckBalance {
            pin: Pin::from(pin),
        })?;
        Ok(self.balance)
    }

    /// Unlike [`Account::check_balance`], viewing the history is not recorded.
    pub fn transaction_history(&self, pin: &str) -> Result<&[TransactionRecord], AccountError> {
        self.require_pin(pin, PinRole::Current)?;
        Ok(&self.history)
    }

    /// Validates the command and, if it passes, applies the resulting event.
    pub fn execute(&mut self, command: AccountCommand) -> Result<(), AccountError> {
        let event = self.handle(&command)?;
        self.apply(event);
        Ok(())
    }

    pub(crate) fn handle(&self, command: &AccountCommand) -> Result<AccountEvent, AccountError> {
        match command {
            AccountCommand::Deposit { amount } => {
                let amount = *amount;
                if amount <= Decimal::ZERO {
                    return Err(AccountError::InvalidAmount {
                        action: AmountAction::Deposit,
                        amount,
                    });
                }
                if self.balance.checked_add(amount).is_none() {
                    return Err(AccountError::BalanceOverflow { amount });
                }
                Ok(AccountEvent::Deposited(amount))
            }
            AccountCommand::Withdraw { amount, pin } => {
                self.require_pin(pin.as_str(), PinRole::Current)?;
                let amount = *amount;
                if amount <= Decimal::ZERO {
                    Err(AccountError::InvalidAmount {
                        action: AmountAction::Withdraw,
                        amount,
                    })
                } else if amount > self.balance {
                    Err(AccountError::InsufficientFunds { requested: amount })
                } else {
                    Ok(AccountEvent::Withdrawn(amount))
                }
            }
            AccountCommand::ChangePin { old_pin, new_pin } => {
                self.require_pin(old_pin.as_str(), PinRole::Old)?;
                Ok(AccountEvent::PinChanged(PinDigest::of(new_pin.as_str())))
            }
            AccountCommand::CheckBalance { pin } => {
                self.require_pin(pin.as_str(), PinRole::Current)?;
                Ok(AccountEvent::BalanceChecked)
            }
        }
    }

    /// Events are produced by [`Account::handle`] only, so no validation here.
    fn apply(&mut self, event: AccountEvent) {
        debug!(?event, "applying account event");
        let record = match event {
            AccountEvent::Deposited(amount) => {
                self.balance += amount;
                TransactionRecord::Deposit(amount)
            }
            AccountEvent::Withdrawn(amount) => {
                self.balance -= amount;
                TransactionRecord::Withdrawal(amount)
            }
            AccountEvent::PinChanged(digest) => {
                self.credential = digest;
                TransactionRecord::PinChanged
            }
            AccountEvent::BalanceChecked => TransactionRecord::BalanceChecked,
        };
        self.history.push(record);
    }

    fn require_pin(&self, pin: &str, role: PinRole) -> Result<(), AccountError> {
        if self.authenticate(pin) {
            Ok(())
        } else {
            debug!(%role, "authentication failed");
            Err(AccountError::AuthenticationFailed { role })
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn account() -> Account {
        Account::new("1234", dec!(100.00)).unwrap()
    }

    #[test]
    fn authenticate_after_construction() {
        let acc = account();
        assert!(acc.authenticate("1234"));
        assert!(!acc.authenticate("0000"));
        assert!(!acc.authenticate("12345"));
        assert!(acc.history.is_empty());
        assert_eq!(acc.balance, dec!(100));
    }

    #[test]
    fn opening_balance_policy() {
        assert!(Account::new("1", Decimal::ZERO).is_ok());
        // -0 is still zero
        assert!(Account::new("1", dec!(-0.00)).is_ok());
        let err = Account::new("1", dec!(-0.01)).unwrap_err();
        assert_eq!(err, AccountError::NegativeOpeningBalance(dec!(-0.01)));
    }

    #[test]
    fn deposit_needs_no_pin() {
        let mut acc = account();
        acc.deposit(dec!(50)).unwrap();
        assert_eq!(acc.balance, dec!(150.00));
        assert_eq!(acc.history, vec![TransactionRecord::Deposit(dec!(50))]);

        for amount in [dec!(0), dec!(-0.01), dec!(-50)] {
            let err = acc.deposit(amount).unwrap_err();
            assert_eq!(
                err,
                AccountError::InvalidAmount {
                    action: AmountAction::Deposit,
                    amount
                }
            );
        }
        assert_eq!(acc.balance, dec!(150));
        assert_eq!(acc.history.len(), 1);
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut acc = Account::new("1234", Decimal::MAX).unwrap();
        let err = acc.deposit(dec!(1)).unwrap_err();
        assert!(matches!(err, AccountError::BalanceOverflow { .. }));
        assert_eq!(acc.balance, Decimal::MAX);
        assert!(acc.history.is_empty());
    }

    #[test]
    fn withdraw() {
        let mut acc = account();

        let err = acc.withdraw(dec!(30), "0000").unwrap_err();
        assert_eq!(
            err,
            AccountError::AuthenticationFailed {
                role: PinRole::Current
            }
        );
        assert_eq!(err.to_string(), "Incorrect PIN");

        // wrong pin wins over a bad amount
        let err = acc.withdraw(dec!(-1), "0000").unwrap_err();
        assert!(matches!(err, AccountError::AuthenticationFailed { .. }));

        let err = acc.withdraw(dec!(0), "1234").unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount { .. }));

        let err = acc.withdraw(dec!(100.01), "1234").unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                requested: dec!(100.01)
            }
        );
        assert_eq!(err.to_string(), "Insufficient balance to withdraw $100.01");
        assert_eq!(acc.balance, dec!(100));
        assert!(acc.history.is_empty());

        acc.withdraw(dec!(30), "1234").unwrap();
        assert_eq!(acc.balance, dec!(70));
        // the whole balance may be taken out
        acc.withdraw(dec!(70), "1234").unwrap();
        assert_eq!(acc.balance, Decimal::ZERO);
        assert_eq!(
            acc.history,
            vec![
                TransactionRecord::Withdrawal(dec!(30)),
                TransactionRecord::Withdrawal(dec!(70))
            ]
        );
    }

    #[test]
    fn change_pin() {
        let mut acc = account();
        let err = acc.change_pin("1111", "9999").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect old PIN");
        assert!(acc.authenticate("1234"));
        assert!(acc.history.is_empty());

        acc.change_pin("1234", "9999").unwrap();
        assert!(!acc.authenticate("1234"));
        assert!(acc.authenticate("9999"));
        assert_eq!(acc.history, vec![TransactionRecord::PinChanged]);

        let err = acc.withdraw(dec!(10), "1234").unwrap_err();
        assert!(matches!(err, AccountError::AuthenticationFailed { .. }));
        acc.withdraw(dec!(10), "9999").unwrap();
        assert_eq!(acc.balance, dec!(90));
    }

    #[test]
    fn balance_checks_are_audited() {
        let mut acc = account();
        assert!(acc.check_balance("4321").is_err());
        assert!(acc.history.is_empty());

        assert_eq!(acc.check_balance("1234").unwrap(), dec!(100));
        assert_eq!(acc.check_balance("1234").unwrap(), dec!(100));
        assert_eq!(
            acc.history,
            vec![
                TransactionRecord::BalanceChecked,
                TransactionRecord::BalanceChecked
            ]
        );
    }

    #[test]
    fn history_view_is_not_audited() {
        let mut acc = account();
        acc.deposit(dec!(1)).unwrap();
        acc.withdraw(dec!(2), "1234").unwrap();
        acc.check_balance("1234").unwrap();

        assert!(acc.transaction_history("0000").is_err());
        let expected = [
            TransactionRecord::Deposit(dec!(1)),
            TransactionRecord::Withdrawal(dec!(2)),
            TransactionRecord::BalanceChecked,
        ];
        assert_eq!(acc.transaction_history("1234").unwrap(), &expected);
        assert_eq!(acc.transaction_history("1234").unwrap(), &expected);
    }

    #[test]
    fn end_to_end_scenario() {
        let mut acc = account();
        acc.deposit(dec!(50)).unwrap();
        assert_eq!(acc.balance, dec!(150.00));
        acc.withdraw(dec!(30), "1234").unwrap();
        assert_eq!(acc.balance, dec!(120.00));
        let err = acc.withdraw(dec!(30), "0000").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect PIN");
        assert_eq!(acc.check_balance("1234").unwrap(), dec!(120.00));

        let history = acc.transaction_history("1234").unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].to_string(), "Deposited: $50.00");
        assert_eq!(history[1].to_string(), "Withdrew: $30.00");
        assert_eq!(history[2].to_string(), "Balance checked.");
    }

    #[test]
    fn handle_does_not_mutate() {
        let acc = account();
        let evt = acc
            .handle(&AccountCommand::Withdraw {
                amount: dec!(5),
                pin: Pin::from("1234"),
            })
            .unwrap();
        assert_eq!(evt, AccountEvent::Withdrawn(dec!(5)));
        let evt = acc
            .handle(&AccountCommand::ChangePin {
                old_pin: Pin::from("1234"),
                new_pin: Pin::from("5678"),
            })
            .unwrap();
        assert_eq!(evt, AccountEvent::PinChanged(PinDigest::of("5678")));
        assert!(acc.authenticate("1234"));
        assert_eq!(acc.balance, dec!(100));
        assert!(acc.history.is_empty());
    }
}
