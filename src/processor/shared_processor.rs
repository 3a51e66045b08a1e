use std::sync::{Arc, Mutex, PoisonError};

use crate::{account::Account, command::Request};

use super::{Receipt, Teller, serve};

/// Several tellers working one account. Each request holds the lock from
/// authentication until its record is appended, so a concurrent PIN change
/// or withdrawal can never interleave with it.
#[derive(Clone)]
pub struct SharedTeller {
    account: Arc<Mutex<Account>>,
}

impl SharedTeller {
    pub fn new(account: Account) -> Self {
        Self {
            account: Arc::new(Mutex::new(account)),
        }
    }
}

impl Teller for SharedTeller {
    fn process(&mut self, request: Request) -> Receipt {
        // Account state is only written by infallible `apply`, so a poisoned
        // lock still guards a consistent account.
        let mut account = self.account.lock().unwrap_or_else(PoisonError::into_inner);
        serve(&mut account, request)
    }
}
