//! Core domain types for the ledger engine.

use crate::Amount;

/// Account identifier. Assigned sequentially from 1, never reused in-process.
pub type AccountId = u32;

/// Transaction identifier. Globally unique across all accounts.
pub type TxId = u32;

/// Maximum account name length; longer input is truncated at entry.
pub const MAX_NAME_LEN: usize = 63;

/// The kind of a committed transaction.
///
/// The `Undo*` kinds are audit markers appended when an operation is
/// reversed; they are not themselves reversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Deposit,
    Withdraw,
    Transfer,
    UndoDeposit,
    UndoWithdraw,
    UndoTransfer,
}

impl TxKind {
    /// Wire name used in the persisted file format.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Deposit => "DEPOSIT",
            TxKind::Withdraw => "WITHDRAW",
            TxKind::Transfer => "TRANSFER",
            TxKind::UndoDeposit => "UNDO_DEPOSIT",
            TxKind::UndoWithdraw => "UNDO_WITHDRAW",
            TxKind::UndoTransfer => "UNDO_TRANSFER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(TxKind::Deposit),
            "WITHDRAW" => Some(TxKind::Withdraw),
            "TRANSFER" => Some(TxKind::Transfer),
            "UNDO_DEPOSIT" => Some(TxKind::UndoDeposit),
            "UNDO_WITHDRAW" => Some(TxKind::UndoWithdraw),
            "UNDO_TRANSFER" => Some(TxKind::UndoTransfer),
            _ => None,
        }
    }

    /// Transfer kinds carry a counterpart account id; everything else records 0.
    pub fn is_transfer(&self) -> bool {
        matches!(self, TxKind::Transfer | TxKind::UndoTransfer)
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit record of one balance-affecting event.
///
/// Owned exclusively by the account it was appended to. A transfer creates
/// two independent records, one per side, each naming the other side as
/// `counterpart`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TxId,
    pub kind: TxKind,
    pub amount: Amount,
    /// The other side of a transfer; 0 for non-transfer kinds.
    pub counterpart: AccountId,
    /// Capture-time wall clock, `YYYY-MM-DD HH:MM:SS`. Never updated.
    pub timestamp: String,
}

impl Transaction {
    /// Create a record stamped with the current wall clock.
    pub fn new(id: TxId, kind: TxKind, amount: Amount, counterpart: AccountId) -> Self {
        Self {
            id,
            kind,
            amount,
            counterpart,
            timestamp: now_string(),
        }
    }
}

pub(crate) fn now_string() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names_round_trip() {
        for kind in [
            TxKind::Deposit,
            TxKind::Withdraw,
            TxKind::Transfer,
            TxKind::UndoDeposit,
            TxKind::UndoWithdraw,
            TxKind::UndoTransfer,
        ] {
            assert_eq!(TxKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        assert_eq!(TxKind::parse("CHARGEBACK"), None);
        assert_eq!(TxKind::parse("deposit"), None);
    }

    #[test]
    fn transfer_kinds_carry_counterpart() {
        assert!(TxKind::Transfer.is_transfer());
        assert!(TxKind::UndoTransfer.is_transfer());
        assert!(!TxKind::Deposit.is_transfer());
        assert!(!TxKind::UndoWithdraw.is_transfer());
    }

    #[test]
    fn new_transaction_captures_timestamp() {
        let tx = Transaction::new(1, TxKind::Deposit, Amount::from_scaled(100), 0);
        // `YYYY-MM-DD HH:MM:SS` is always 19 chars
        assert_eq!(tx.timestamp.len(), 19);
        assert_eq!(&tx.timestamp[4..5], "-");
        assert_eq!(&tx.timestamp[10..11], " ");
    }
}
