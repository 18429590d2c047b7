//! Error types for ledger operations.

use thiserror::Error;

use crate::Amount;
use crate::model::AccountId;

/// Error during a deposit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepositError {
    #[error("account {0} not found")]
    NotFound(AccountId),
}

/// Error during a withdrawal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WithdrawError {
    #[error("account {0} not found")]
    NotFound(AccountId),

    #[error("insufficient funds in account {0}: balance {1}, requested {2}")]
    InsufficientFunds(AccountId, Amount, Amount),
}

/// Error during a transfer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("source and destination are the same account ({0})")]
    SameAccount(AccountId),

    #[error("account {0} not found")]
    NotFound(AccountId),

    #[error("insufficient funds in account {0}: balance {1}, requested {2}")]
    InsufficientFunds(AccountId, Amount, Amount),
}

/// Outcome of a refused or impossible undo.
///
/// None of these are fatal, and except for [`Empty`](UndoError::Empty) the
/// popped record has already been consumed: a refused undo is not retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UndoError {
    #[error("nothing to undo")]
    Empty,

    #[error("cannot undo deposit of {1} from account {0}: balance now insufficient")]
    CannotReverseDeposit(AccountId, Amount),

    #[error("cannot undo transfer of {amount} from {from} to {to}: destination no longer holds the funds")]
    CannotReverseTransfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },

    #[error("account {0} no longer exists")]
    AccountGone(AccountId),
}
