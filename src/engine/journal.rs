use crate::Amount;
use crate::model::AccountId;

/// Which forward operation an [`UndoRecord`] reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Create,
    Deposit,
    Withdraw,
    Transfer,
}

/// A minimal reversal instruction, distinct from an audit [`Transaction`].
///
/// Carries just enough to reverse the forward effect without consulting the
/// transaction history.
///
/// [`Transaction`]: crate::model::Transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub op: OpKind,
    pub account: AccountId,
    /// Transfer destination; 0 otherwise.
    pub counterpart: AccountId,
    pub amount: Amount,
}

/// A strict LIFO stack of reversal instructions.
///
/// One entry per successful forward operation, for the life of the process.
/// Never persisted: after a reload, prior history is not undoable.
#[derive(Debug, Default)]
pub struct UndoJournal {
    stack: Vec<UndoRecord>,
}

impl UndoJournal {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, record: UndoRecord) {
        self.stack.push(record);
    }

    /// Remove and return the most recent record, or `None` when there is
    /// nothing to undo.
    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
