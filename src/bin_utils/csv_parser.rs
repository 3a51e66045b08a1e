use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

use crate::{
    command::{AccountCommand, AccountCommandError, AmountAction, Request, parse_amount},
    credential::Pin,
};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptOp {
    Balance,
    Withdraw,
    Deposit,
    ChangePin,
    History,
}

impl ScriptOp {
    fn name(self) -> &'static str {
        match self {
            ScriptOp::Balance => "balance",
            ScriptOp::Withdraw => "withdraw",
            ScriptOp::Deposit => "deposit",
            ScriptOp::ChangePin => "change_pin",
            ScriptOp::History => "history",
        }
    }
}

/// One line of a script: `op,amount,pin,new_pin`. Unused columns may be empty
/// or left off. PIN cells are taken exactly as written, and an empty or missing
/// one is the empty PIN.
#[derive(Debug, Deserialize)]
pub struct ScriptRow {
    pub op: ScriptOp,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub new_pin: Option<String>,
}

impl ScriptRow {
    pub fn into_request(self) -> Result<Request, AccountCommandError> {
        let op = self.op;
        let amount = |value: Option<String>, action: AmountAction| {
            value
                .ok_or(AccountCommandError::MissingField {
                    op: op.name(),
                    column: "amount",
                })
                .and_then(|value| parse_amount(&value, action))
        };
        let pin = |value: Option<String>| Pin::new(value.unwrap_or_default());
        let request = match op {
            ScriptOp::Balance => AccountCommand::CheckBalance { pin: pin(self.pin) }.into(),
            ScriptOp::Withdraw => AccountCommand::Withdraw {
                amount: amount(self.amount, AmountAction::Withdraw)?,
                pin: pin(self.pin),
            }
            .into(),
            ScriptOp::Deposit => AccountCommand::Deposit {
                amount: amount(self.amount, AmountAction::Deposit)?,
            }
            .into(),
            ScriptOp::ChangePin => AccountCommand::ChangePin {
                old_pin: pin(self.pin),
                new_pin: pin(self.new_pin),
            }
            .into(),
            ScriptOp::History => Request::ViewHistory { pin: pin(self.pin) },
        };
        Ok(request)
    }
}

/// Reads script rows in CSV format, paired with the line they start on.
pub struct CsvScriptParser<R> {
    iter: DeserializeRecordsIntoIter<R, ScriptRow>,
}

impl<R> CsvScriptParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> csv::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(source);
        // consume the header row now, so positions below point at data rows
        reader.headers()?;

        Ok(Self {
            iter: reader.into_deserialize(),
        })
    }
}

impl<R> Iterator for CsvScriptParser<R>
where
    R: Read,
{
    type Item = (u64, Result<ScriptRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
