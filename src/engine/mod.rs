//! The ledger operation engine.
//!
//! Owns the account store and the undo journal, and implements the five
//! balance-changing operations: create, deposit, withdraw, transfer, undo.
//! Every operation is atomic with respect to the store: it either commits
//! fully (balance change, audit transaction, journal entry) or rejects
//! before any mutation.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::Amount;
use crate::codec::{self, CodecError};
use crate::model::{AccountId, Transaction, TxKind};

mod state;
pub use state::{Account, Ledger};

mod journal;
use journal::{OpKind, UndoJournal, UndoRecord};

mod error;
pub use error::{DepositError, TransferError, UndoError, WithdrawError};

/// Description of the effect a successful undo reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undone {
    Deposit { account: AccountId, amount: Amount },
    Withdraw { account: AccountId, amount: Amount },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    Create { account: AccountId },
}

impl fmt::Display for Undone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undone::Deposit { account, amount } => {
                write!(f, "undid deposit of {amount} from account {account}")
            }
            Undone::Withdraw { account, amount } => {
                write!(f, "undid withdrawal of {amount} to account {account}")
            }
            Undone::Transfer { from, to, amount } => {
                write!(f, "undid transfer of {amount} from account {from} to account {to}")
            }
            Undone::Create { account } => {
                write!(f, "undid creation of account {account}")
            }
        }
    }
}

/// The ledger engine.
///
/// Single-threaded by design: one logical actor issues one operation at a
/// time. Anything exposing this as a shared service must add its own
/// mutual exclusion around the whole engine.
pub struct Engine {
    ledger: Ledger,
    journal: UndoJournal,
}

/// Public API
impl Engine {
    pub fn new() -> Self {
        Self {
            ledger: Ledger::new(),
            journal: UndoJournal::new(),
        }
    }

    /// Create a new account with a freshly assigned id.
    ///
    /// Never fails: the opening balance is accepted as given, including
    /// negative values, and the name is truncated to the bounded length.
    /// The opening balance is recorded as a `DEPOSIT` transaction.
    pub fn create_account(&mut self, name: &str, opening: Amount) -> AccountId {
        let id = self.ledger.alloc_account_id();
        let tx_id = self.ledger.alloc_tx_id();
        let mut account = Account::new(id, name, opening);
        account.record(Transaction::new(tx_id, TxKind::Deposit, opening, 0));
        self.ledger.insert(account);
        self.journal.push(UndoRecord {
            op: OpKind::Create,
            account: id,
            counterpart: 0,
            amount: opening,
        });
        info!(account = id, opening = %opening, "account created");
        id
    }

    /// Credit `amount` to an account.
    pub fn deposit(&mut self, id: AccountId, amount: Amount) -> Result<(), DepositError> {
        let result = self.apply_deposit(id, amount);
        Self::log_result("deposit", id, amount, &result);
        result
    }

    /// Debit `amount` from an account, rejecting anything that would drive
    /// the balance negative.
    pub fn withdraw(&mut self, id: AccountId, amount: Amount) -> Result<(), WithdrawError> {
        let result = self.apply_withdraw(id, amount);
        Self::log_result("withdrawal", id, amount, &result);
        result
    }

    /// Move `amount` between two distinct accounts. Both sides get their own
    /// `TRANSFER` audit transaction naming the other as counterpart.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let result = self.apply_transfer(from, to, amount);
        match &result {
            Ok(()) => info!(from, to, amount = %amount, "transfer applied"),
            Err(e) => info!(from, to, amount = %amount, reason = %e, "transfer skipped"),
        }
        result
    }

    /// Reverse the most recent forward operation.
    ///
    /// Best-effort LIFO reversal, not a transactional rollback: the single
    /// balance precondition stated per operation kind is checked, nothing
    /// else. The popped record is consumed even when the reversal is
    /// refused.
    pub fn undo_last(&mut self) -> Result<Undone, UndoError> {
        let record = self.journal.pop().ok_or(UndoError::Empty)?;
        let result = self.reverse(record);
        match &result {
            Ok(undone) => info!(%undone, "undo applied"),
            Err(e) => warn!(reason = %e, "undo refused"),
        }
        result
    }

    /// All accounts, most recently created first.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.ledger.accounts()
    }

    /// Look up one account.
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.ledger.get(id)
    }

    /// Serialize the whole ledger to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        codec::save(&self.ledger, path)
    }

    /// Replace the in-memory ledger with the contents of `path`.
    ///
    /// Returns `false` when the file does not exist, leaving current state
    /// untouched. The undo journal is not reset: entries recorded before the
    /// load keep referencing the ids they were pushed with.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool, CodecError> {
        match codec::load(path)? {
            Some(ledger) => {
                self.ledger = ledger;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Private API
impl Engine {
    fn log_result<E: fmt::Display>(
        op: &str,
        account: AccountId,
        amount: Amount,
        result: &Result<(), E>,
    ) {
        match result {
            Ok(()) => info!(account, amount = %amount, "{op} applied"),
            Err(e) => info!(account, amount = %amount, reason = %e, "{op} skipped"),
        }
    }

    fn apply_deposit(&mut self, id: AccountId, amount: Amount) -> Result<(), DepositError> {
        self.ledger.get(id).ok_or(DepositError::NotFound(id))?;

        let tx = Transaction::new(self.ledger.alloc_tx_id(), TxKind::Deposit, amount, 0);
        let account = self.ledger.get_mut(id).ok_or(DepositError::NotFound(id))?;
        account.credit(amount);
        account.record(tx);

        self.journal.push(UndoRecord {
            op: OpKind::Deposit,
            account: id,
            counterpart: 0,
            amount,
        });
        Ok(())
    }

    fn apply_withdraw(&mut self, id: AccountId, amount: Amount) -> Result<(), WithdrawError> {
        let account = self.ledger.get(id).ok_or(WithdrawError::NotFound(id))?;
        if account.balance() < amount {
            return Err(WithdrawError::InsufficientFunds(id, account.balance(), amount));
        }

        let tx = Transaction::new(self.ledger.alloc_tx_id(), TxKind::Withdraw, amount, 0);
        let account = self.ledger.get_mut(id).ok_or(WithdrawError::NotFound(id))?;
        account.debit(amount);
        account.record(tx);

        self.journal.push(UndoRecord {
            op: OpKind::Withdraw,
            account: id,
            counterpart: 0,
            amount,
        });
        Ok(())
    }

    fn apply_transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if from == to {
            return Err(TransferError::SameAccount(from));
        }
        if !self.ledger.contains(to) {
            return Err(TransferError::NotFound(to));
        }
        let source = self.ledger.get(from).ok_or(TransferError::NotFound(from))?;
        if source.balance() < amount {
            return Err(TransferError::InsufficientFunds(from, source.balance(), amount));
        }

        let out_tx = Transaction::new(self.ledger.alloc_tx_id(), TxKind::Transfer, amount, to);
        let in_tx = Transaction::new(self.ledger.alloc_tx_id(), TxKind::Transfer, amount, from);

        let source = self.ledger.get_mut(from).ok_or(TransferError::NotFound(from))?;
        source.debit(amount);
        source.record(out_tx);
        let dest = self.ledger.get_mut(to).ok_or(TransferError::NotFound(to))?;
        dest.credit(amount);
        dest.record(in_tx);

        self.journal.push(UndoRecord {
            op: OpKind::Transfer,
            account: from,
            counterpart: to,
            amount,
        });
        Ok(())
    }

    fn reverse(&mut self, record: UndoRecord) -> Result<Undone, UndoError> {
        let UndoRecord {
            op,
            account: id,
            counterpart,
            amount,
        } = record;
        match op {
            OpKind::Deposit => {
                let account = self.ledger.get(id).ok_or(UndoError::AccountGone(id))?;
                if account.balance() < amount {
                    return Err(UndoError::CannotReverseDeposit(id, amount));
                }
                let tx =
                    Transaction::new(self.ledger.alloc_tx_id(), TxKind::UndoDeposit, amount, 0);
                let account = self.ledger.get_mut(id).ok_or(UndoError::AccountGone(id))?;
                account.debit(amount);
                account.record(tx);
                Ok(Undone::Deposit { account: id, amount })
            }
            OpKind::Withdraw => {
                // reversal is a credit, so no balance precondition
                self.ledger.get(id).ok_or(UndoError::AccountGone(id))?;
                let tx =
                    Transaction::new(self.ledger.alloc_tx_id(), TxKind::UndoWithdraw, amount, 0);
                let account = self.ledger.get_mut(id).ok_or(UndoError::AccountGone(id))?;
                account.credit(amount);
                account.record(tx);
                Ok(Undone::Withdraw { account: id, amount })
            }
            OpKind::Transfer => {
                self.ledger.get(id).ok_or(UndoError::AccountGone(id))?;
                let dest = self
                    .ledger
                    .get(counterpart)
                    .ok_or(UndoError::AccountGone(counterpart))?;
                // the destination may have spent the funds since
                if dest.balance() < amount {
                    return Err(UndoError::CannotReverseTransfer {
                        from: id,
                        to: counterpart,
                        amount,
                    });
                }

                let back_tx = Transaction::new(
                    self.ledger.alloc_tx_id(),
                    TxKind::UndoTransfer,
                    amount,
                    counterpart,
                );
                let forth_tx = Transaction::new(
                    self.ledger.alloc_tx_id(),
                    TxKind::UndoTransfer,
                    amount,
                    id,
                );
                let source = self.ledger.get_mut(id).ok_or(UndoError::AccountGone(id))?;
                source.credit(amount);
                source.record(back_tx);
                let dest = self
                    .ledger
                    .get_mut(counterpart)
                    .ok_or(UndoError::AccountGone(counterpart))?;
                dest.debit(amount);
                dest.record(forth_tx);
                Ok(Undone::Transfer {
                    from: id,
                    to: counterpart,
                    amount,
                })
            }
            OpKind::Create => self
                .ledger
                .remove(id)
                .map(|_| Undone::Create { account: id })
                .ok_or(UndoError::AccountGone(id)),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
