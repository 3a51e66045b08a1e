//! Front ends that bootstrap [`crate::account`] for the binary: the interactive
//! menu and the CSV script runner. Both only talk to the account through a
//! [`Teller`].

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    account::Account,
    command::{AccountCommand, AccountCommandError, AmountAction, MenuChoice, Request, parse_amount},
    credential::Pin,
    processor::{Teller, in_memory_processor::InMemoryTeller},
};
use csv_parser::CsvScriptParser;
use csv_printer::{ReceiptRow, print_receipts};

pub mod csv_parser;
pub mod csv_printer;
pub mod menu;

/// Initial state of the single account a session works with.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub pin: Pin,
    pub opening_balance: Decimal,
}

impl SessionConfig {
    pub fn open_account(&self) -> Result<Account> {
        Account::new(self.pin.as_str(), self.opening_balance).context("Failed to open the account")
    }
}

/// What the user asked for after picking a menu entry.
enum Step {
    Request(Request),
    Rejected(AccountCommandError),
    Exit,
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: SessionConfig,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: BufRead,
    W: Write + 'w,
{
    /// Menu loop. Returns when the user picks exit or the input runs out.
    pub fn run(mut self) -> Result<()> {
        let mut teller = InMemoryTeller::new(self.config.open_account()?);
        info!("session started");

        writeln!(self.output, "Welcome to the ATM Simulation!")?;
        loop {
            menu::print_menu(self.output)?;
            let Some(line) = menu::read_line(&mut self.input)? else {
                break;
            };
            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };
            match self.read_request(choice)? {
                Step::Request(request) => {
                    let receipt = teller.process(request);
                    menu::print_receipt(self.output, &receipt)?;
                }
                Step::Rejected(err) => {
                    debug!(%err, "input rejected");
                    writeln!(self.output, "{err}")?;
                }
                Step::Exit => break,
            }
        }
        writeln!(self.output, "Thank you for using the ATM Simulation. Goodbye!")?;
        self.output.flush()?;
        info!("session ended");
        Ok(())
    }

    fn read_request(&mut self, choice: MenuChoice) -> Result<Step> {
        let step = match choice {
            MenuChoice::CheckBalance => self
                .ask_pin("Enter PIN: ")?
                .map(|pin| Step::Request(AccountCommand::CheckBalance { pin }.into())),
            MenuChoice::Withdraw => {
                match self.ask_amount("Enter amount to withdraw: ", AmountAction::Withdraw)? {
                    Some(Ok(amount)) => self.ask_pin("Enter PIN: ")?.map(|pin| {
                        Step::Request(AccountCommand::Withdraw { amount, pin }.into())
                    }),
                    Some(Err(err)) => Some(Step::Rejected(err)),
                    None => None,
                }
            }
            MenuChoice::Deposit => self
                .ask_amount("Enter amount to deposit: ", AmountAction::Deposit)?
                .map(|amount| match amount {
                    Ok(amount) => Step::Request(AccountCommand::Deposit { amount }.into()),
                    Err(err) => Step::Rejected(err),
                }),
            MenuChoice::ChangePin => match self.ask_pin("Enter old PIN: ")? {
                Some(old_pin) => self.ask_pin("Enter new PIN: ")?.map(|new_pin| {
                    Step::Request(AccountCommand::ChangePin { old_pin, new_pin }.into())
                }),
                None => None,
            },
            MenuChoice::ViewHistory => self
                .ask_pin("Enter PIN: ")?
                .map(|pin| Step::Request(Request::ViewHistory { pin })),
            MenuChoice::Exit => Some(Step::Exit),
        };
        // running out of input halfway through a prompt ends the session
        Ok(step.unwrap_or(Step::Exit))
    }

    fn ask_pin(&mut self, label: &str) -> Result<Option<Pin>> {
        Ok(menu::prompt(&mut self.input, self.output, label)?.map(Pin::new))
    }

    fn ask_amount(
        &mut self,
        label: &str,
        action: AmountAction,
    ) -> Result<Option<Result<Decimal, AccountCommandError>>> {
        Ok(menu::prompt(&mut self.input, self.output, label)?
            .map(|input| parse_amount(&input, action)))
    }

    /// Runs every row of a CSV script and prints one receipt row per request.
    /// Rows that cannot be turned into a request are passed to `error_printer`
    /// and skipped.
    pub fn run_script(self, mut error_printer: impl FnMut(u64, anyhow::Error)) -> Result<()> {
        let mut teller = InMemoryTeller::new(self.config.open_account()?);
        let parser = CsvScriptParser::new(self.input).context("Failed to read script header")?;
        info!("script started");

        let mut receipts = Vec::new();
        for (line, row) in parser {
            let request = row
                .map_err(anyhow::Error::from)
                .and_then(|row| row.into_request().map_err(anyhow::Error::from));
            match request {
                Ok(request) => receipts.push(ReceiptRow::new(line, teller.process(request))),
                Err(err) => error_printer(line, err),
            }
        }
        info!(requests = receipts.len(), "script finished");

        print_receipts(self.output, receipts.into_iter())
    }
}
