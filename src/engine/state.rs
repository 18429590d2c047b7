use std::collections::{HashMap, VecDeque};

use crate::Amount;
use crate::model::{AccountId, MAX_NAME_LEN, Transaction, TxId};

/// A named balance-holding account with its append-only transaction history.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    name: String,
    balance: Amount,
    /// Newest record at the front.
    transactions: VecDeque<Transaction>,
}

impl Account {
    pub(crate) fn new(id: AccountId, name: &str, balance: Amount) -> Self {
        Self {
            id,
            name: truncate_name(name),
            balance,
            transactions: VecDeque::new(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub(crate) fn credit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    pub(crate) fn debit(&mut self, amount: Amount) {
        self.balance -= amount;
    }

    /// Append a freshly committed record at the head (newest-first order).
    pub(crate) fn record(&mut self, tx: Transaction) {
        self.transactions.push_front(tx);
    }

    /// Re-attach a persisted record at the tail. Load feeds records in the
    /// order they were saved (newest first), so appending at the back keeps
    /// the history newest-first.
    pub(crate) fn restore(&mut self, tx: Transaction) {
        self.transactions.push_back(tx);
    }

    /// Transaction history, newest first.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter()
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LEN).collect()
}

/// The Ledger Store: all live accounts plus the process-wide id counters.
///
/// An id-keyed map paired with an explicit creation-order list, so account
/// enumeration can stay newest-created-first without scanning the map.
#[derive(Debug)]
pub struct Ledger {
    accounts: HashMap<AccountId, Account>,
    /// Creation order, oldest first.
    order: Vec<AccountId>,
    next_account_id: AccountId,
    next_tx_id: TxId,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            order: Vec::new(),
            next_account_id: 1,
            next_tx_id: 1,
        }
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(&id)
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Allocate the next account id. Ids are never handed out twice, even
    /// after the account they went to has been removed.
    pub(crate) fn alloc_account_id(&mut self) -> AccountId {
        let id = self.next_account_id;
        self.next_account_id += 1;
        id
    }

    pub(crate) fn alloc_tx_id(&mut self) -> TxId {
        let id = self.next_tx_id;
        self.next_tx_id += 1;
        id
    }

    /// Insert a new account. The caller supplies a fresh id from
    /// [`alloc_account_id`](Self::alloc_account_id) (or a persisted one
    /// during load).
    pub(crate) fn insert(&mut self, account: Account) {
        self.order.push(account.id);
        self.accounts.insert(account.id, account);
    }

    /// Remove an account and its entire history. Only the undo-of-creation
    /// path does this.
    pub(crate) fn remove(&mut self, id: AccountId) -> Option<Account> {
        let removed = self.accounts.remove(&id);
        if removed.is_some() {
            self.order.retain(|&other| other != id);
        }
        removed
    }

    /// All accounts, most recently created first.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        self.order.iter().rev().filter_map(|id| self.accounts.get(id))
    }

    /// Recompute both id counters from the ids currently present, one past
    /// the maximum seen. Called after a load rebuilds the store.
    pub(crate) fn rederive_counters(&mut self) {
        let max_account = self.accounts.keys().copied().max().unwrap_or(0);
        let max_tx = self
            .accounts
            .values()
            .flat_map(|acc| acc.transactions.iter())
            .map(|tx| tx.id)
            .max()
            .unwrap_or(0);
        self.next_account_id = max_account + 1;
        self.next_tx_id = max_tx + 1;
    }

    #[cfg(test)]
    pub(crate) fn next_ids(&self) -> (AccountId, TxId) {
        (self.next_account_id, self.next_tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TxKind;

    fn ledger_with(names: &[&str]) -> Ledger {
        let mut ledger = Ledger::new();
        for name in names {
            let id = ledger.alloc_account_id();
            ledger.insert(Account::new(id, name, Amount::ZERO));
        }
        ledger
    }

    #[test]
    fn accounts_enumerate_newest_first() {
        let ledger = ledger_with(&["first", "second", "third"]);
        let names: Vec<_> = ledger.accounts().map(|a| a.name()).collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let mut ledger = ledger_with(&["first", "second", "third"]);
        ledger.remove(2);
        let names: Vec<_> = ledger.accounts().map(|a| a.name()).collect();
        assert_eq!(names, ["third", "first"]);
    }

    #[test]
    fn removed_id_is_not_reallocated() {
        let mut ledger = ledger_with(&["first", "second"]);
        ledger.remove(2);
        assert_eq!(ledger.alloc_account_id(), 3);
    }

    #[test]
    fn name_is_truncated_at_entry() {
        let long = "x".repeat(100);
        let account = Account::new(1, &long, Amount::ZERO);
        assert_eq!(account.name().len(), MAX_NAME_LEN);
    }

    #[test]
    fn record_keeps_newest_first() {
        let mut account = Account::new(1, "a", Amount::ZERO);
        account.record(Transaction::new(1, TxKind::Deposit, Amount::from_scaled(100), 0));
        account.record(Transaction::new(2, TxKind::Withdraw, Amount::from_scaled(50), 0));
        let ids: Vec<_> = account.transactions().map(|tx| tx.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn restore_appends_in_saved_order() {
        let mut account = Account::new(1, "a", Amount::ZERO);
        // saved newest-first: 2 then 1
        account.restore(Transaction::new(2, TxKind::Withdraw, Amount::from_scaled(50), 0));
        account.restore(Transaction::new(1, TxKind::Deposit, Amount::from_scaled(100), 0));
        let ids: Vec<_> = account.transactions().map(|tx| tx.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn rederive_counters_resumes_above_max() {
        let mut ledger = Ledger::new();
        let mut account = Account::new(7, "a", Amount::ZERO);
        account.restore(Transaction::new(42, TxKind::Deposit, Amount::ZERO, 0));
        ledger.insert(account);
        ledger.rederive_counters();
        assert_eq!(ledger.next_ids(), (8, 43));
    }
}
