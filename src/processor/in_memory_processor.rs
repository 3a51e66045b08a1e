use crate::{account::Account, command::Request};

use super::{Receipt, Teller, serve};

/// Owns the one account for the lifetime of a session.
pub struct InMemoryTeller {
    account: Account,
}

impl InMemoryTeller {
    pub fn new(account: Account) -> Self {
        Self { account }
    }
}

impl Teller for InMemoryTeller {
    fn process(&mut self, request: Request) -> Receipt {
        serve(&mut self.account, request)
    }
}
