//! Persistence codec: the flat-file representation of the ledger.
//!
//! One record per line, `|`-delimited, no header:
//!
//! ```text
//! ACC|<id>|<name>|<balance>
//! TX|<account_id>|<tx_id>|<kind>|<amount>|<counterpart_id>|<timestamp>
//! ```
//!
//! Accounts are written most-recently-created first, each followed by its
//! transactions newest-first. The undo journal is deliberately not part of
//! this format; undo history does not survive a reload.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::Amount;
use crate::engine::{Account, Ledger};
use crate::model::{AccountId, Transaction, TxId, TxKind};

/// Errors surfaced by save/load. In-memory state is never touched on any of
/// these paths.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to open {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to write ledger data: {0}")]
    Write(#[from] csv::Error),
}

/// `ACC|<id>|<name>|<balance>` as read from the file.
#[derive(Debug, Deserialize)]
struct AccRow {
    tag: String,
    id: AccountId,
    name: String,
    balance: f64,
}

/// `TX|<account_id>|<tx_id>|<kind>|<amount>|<counterpart_id>|<timestamp>`
/// as read from the file.
#[derive(Debug, Deserialize)]
struct TxRow {
    tag: String,
    account: AccountId,
    tx: TxId,
    kind: String,
    amount: f64,
    counterpart: AccountId,
    timestamp: String,
}

/// Write-side rows render amounts through [`Amount`]'s two-digit `Display`.
#[derive(Debug, Serialize)]
struct AccOut<'a> {
    tag: &'static str,
    id: AccountId,
    name: &'a str,
    balance: String,
}

#[derive(Debug, Serialize)]
struct TxOut<'a> {
    tag: &'static str,
    account: AccountId,
    tx: TxId,
    kind: &'static str,
    amount: String,
    counterpart: AccountId,
    timestamp: &'a str,
}

fn writer_for(file: File) -> csv::Writer<File> {
    csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .from_writer(file)
}

fn reader_for(file: File) -> csv::Reader<File> {
    csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .from_reader(file)
}

/// Serialize the whole ledger to `path`, replacing any previous contents.
pub fn save(ledger: &Ledger, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = writer_for(file);

    for account in ledger.accounts() {
        writer.serialize(AccOut {
            tag: "ACC",
            id: account.id(),
            name: account.name(),
            balance: account.balance().to_string(),
        })?;
        for tx in account.transactions() {
            writer.serialize(TxOut {
                tag: "TX",
                account: account.id(),
                tx: tx.id,
                kind: tx.kind.as_str(),
                amount: tx.amount.to_string(),
                counterpart: tx.counterpart,
                timestamp: &tx.timestamp,
            })?;
        }
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Rebuild a ledger from `path`.
///
/// A missing file means "no prior data" and yields `Ok(None)`; the caller
/// keeps its current state. Malformed rows, rows of unknown type, and `TX`
/// rows naming an account with no `ACC` record are skipped. Id counters are
/// recomputed one past the maximum id seen.
pub fn load(path: impl AsRef<Path>) -> Result<Option<Ledger>, CodecError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CodecError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // First pass: collect rows. Transaction rows may appear anywhere in the
    // file, so they are attached only once every account is known.
    let mut acc_rows: Vec<(AccountId, String, Amount)> = Vec::new();
    let mut tx_rows: Vec<(AccountId, Transaction)> = Vec::new();

    for (idx, result) in reader_for(file).into_records().enumerate() {
        let line = idx + 1;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(line, error = %err, "skipping unreadable line");
                continue;
            }
        };
        match record.get(0) {
            Some("ACC") => match parse_acc(&record) {
                Some(row) => acc_rows.push(row),
                None => warn!(line, "skipping malformed ACC line"),
            },
            Some("TX") => match parse_tx(&record) {
                Some(row) => tx_rows.push(row),
                None => warn!(line, "skipping malformed TX line"),
            },
            _ => warn!(line, "skipping unrecognized line"),
        }
    }

    // Accounts are saved newest-first; insert oldest-first so enumeration
    // order survives the round-trip.
    let mut ledger = Ledger::new();
    for (id, name, balance) in acc_rows.into_iter().rev() {
        if ledger.contains(id) {
            warn!(account = id, "skipping duplicate ACC line");
            continue;
        }
        ledger.insert(Account::new(id, &name, balance));
    }

    for (account_id, tx) in tx_rows {
        match ledger.get_mut(account_id) {
            Some(account) => account.restore(tx),
            None => warn!(account = account_id, tx = tx.id, "dropping TX for unknown account"),
        }
    }

    ledger.rederive_counters();
    Ok(Some(ledger))
}

fn parse_acc(record: &csv::StringRecord) -> Option<(AccountId, String, Amount)> {
    let row: AccRow = record.deserialize(None).ok()?;
    (row.tag == "ACC").then(|| (row.id, row.name, Amount::from_float(row.balance)))
}

fn parse_tx(record: &csv::StringRecord) -> Option<(AccountId, Transaction)> {
    let row: TxRow = record.deserialize(None).ok()?;
    if row.tag != "TX" {
        return None;
    }
    let kind = TxKind::parse(&row.kind)?;
    Some((
        row.account,
        Transaction {
            id: row.tx,
            kind,
            amount: Amount::from_float(row.amount),
            counterpart: row.counterpart,
            timestamp: row.timestamp,
        },
    ))
}
