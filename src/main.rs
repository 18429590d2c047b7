//! Interactive menu front-end for the ledger engine.
//!
//! Thin by design: all prompting, numeric validation, and rendering happens
//! here; every balance-changing decision is the engine's.

use std::env;
use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use finance_buddy::engine::UndoError;
use finance_buddy::{AccountId, Amount, Engine};

const MENU: &str = "\n--- Finance Buddy ---\n\
1) Create account\n\
2) List accounts\n\
3) Deposit\n\
4) Withdraw\n\
5) Transfer\n\
6) View transactions\n\
7) Undo last operation\n\
8) Save data\n\
9) Load data\n\
0) Exit\n\
Choose: ";

type Lines = io::Lines<io::StdinLock<'static>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(io::stderr)
        .init();

    let datafile = env::args()
        .nth(1)
        .unwrap_or_else(|| "finance_data.txt".to_string());

    let mut engine = Engine::new();
    match engine.load(&datafile) {
        Ok(true) => println!("Loaded existing data from {datafile}"),
        Ok(false) => {}
        Err(e) => println!("Error loading data: {e}"),
    }
    println!("Welcome to Finance Buddy (data file: {datafile})");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    run_menu(&mut engine, &mut lines, &datafile);
}

/// Dispatch menu choices until exit or end of input.
fn run_menu(engine: &mut Engine, lines: &mut Lines, datafile: &str) -> Option<()> {
    loop {
        let choice = read_line(lines, MENU)?;
        match choice.trim() {
            "0" => {
                save(engine, datafile);
                println!("Exiting.");
                return Some(());
            }
            "1" => create_account(engine, lines)?,
            "2" => list_accounts(engine),
            "3" => deposit(engine, lines)?,
            "4" => withdraw(engine, lines)?,
            "5" => transfer(engine, lines)?,
            "6" => view_transactions(engine, lines)?,
            "7" => undo(engine),
            "8" => save(engine, datafile),
            "9" => load(engine, datafile),
            _ => println!("Invalid choice."),
        }
    }
}

fn create_account(engine: &mut Engine, lines: &mut Lines) -> Option<()> {
    let name = read_line(lines, "Account holder name: ")?;
    let opening = read_amount(lines, "Opening balance: ")?;
    let id = engine.create_account(name.trim(), opening);
    if let Some(account) = engine.account(id) {
        println!("Created account {} with ID {}", account.name(), id);
    }
    Some(())
}

fn list_accounts(engine: &Engine) {
    println!("Accounts:");
    if engine.accounts().next().is_none() {
        println!("  (no accounts yet)");
        return;
    }
    for account in engine.accounts() {
        println!(
            "  ID:{}  Name:{}  Balance:{}",
            account.id(),
            account.name(),
            account.balance()
        );
    }
}

fn deposit(engine: &mut Engine, lines: &mut Lines) -> Option<()> {
    let id = read_id(lines, "Account ID: ")?;
    let amount = read_amount(lines, "Amount to deposit: ")?;
    match engine.deposit(id, amount) {
        Ok(()) => println!("Deposited {amount} to account {id}"),
        Err(e) => println!("Cannot deposit: {e}"),
    }
    Some(())
}

fn withdraw(engine: &mut Engine, lines: &mut Lines) -> Option<()> {
    let id = read_id(lines, "Account ID: ")?;
    let amount = read_amount(lines, "Amount to withdraw: ")?;
    match engine.withdraw(id, amount) {
        Ok(()) => println!("Withdrew {amount} from account {id}"),
        Err(e) => println!("Cannot withdraw: {e}"),
    }
    Some(())
}

fn transfer(engine: &mut Engine, lines: &mut Lines) -> Option<()> {
    let from = read_id(lines, "From account ID: ")?;
    let to = read_id(lines, "To account ID: ")?;
    let amount = read_amount(lines, "Amount to transfer: ")?;
    match engine.transfer(from, to, amount) {
        Ok(()) => println!("Transferred {amount} from account {from} to account {to}"),
        Err(e) => println!("Cannot transfer: {e}"),
    }
    Some(())
}

fn view_transactions(engine: &Engine, lines: &mut Lines) -> Option<()> {
    let id = read_id(lines, "Account ID: ")?;
    let Some(account) = engine.account(id) else {
        println!("Account not found.");
        return Some(());
    };
    println!(
        "Transactions for {} (ID {}) [newest first]:",
        account.name(),
        account.id()
    );
    if account.transactions().next().is_none() {
        println!("  (no transactions)");
        return Some(());
    }
    for tx in account.transactions() {
        if tx.kind.is_transfer() {
            println!(
                "  [{}] {} {}  to/from account {}",
                tx.timestamp, tx.kind, tx.amount, tx.counterpart
            );
        } else {
            println!("  [{}] {} {}", tx.timestamp, tx.kind, tx.amount);
        }
    }
    Some(())
}

fn undo(engine: &mut Engine) {
    match engine.undo_last() {
        Ok(undone) => println!("{undone}"),
        Err(UndoError::Empty) => println!("Nothing to undo."),
        Err(e) => println!("Cannot undo: {e}"),
    }
}

fn save(engine: &Engine, datafile: &str) {
    match engine.save(datafile) {
        Ok(()) => println!("Data saved to {datafile}"),
        Err(e) => println!("Error saving data: {e}"),
    }
}

fn load(engine: &mut Engine, datafile: &str) {
    match engine.load(datafile) {
        Ok(true) => println!("Data loaded."),
        Ok(false) => println!("No data file found."),
        Err(e) => println!("Error loading data: {e}"),
    }
}

fn read_line(lines: &mut Lines, prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok();
    lines.next()?.ok()
}

/// Prompt until the input parses as a number. Any sign is accepted here;
/// the engine decides which operations reject negatives.
fn read_amount(lines: &mut Lines, prompt: &str) -> Option<Amount> {
    loop {
        let input = read_line(lines, prompt)?;
        match input.trim().parse::<f64>() {
            Ok(value) => return Some(Amount::from_float(value)),
            Err(_) => println!("Please enter a numeric amount."),
        }
    }
}

fn read_id(lines: &mut Lines, prompt: &str) -> Option<AccountId> {
    loop {
        let input = read_line(lines, prompt)?;
        match input.trim().parse::<AccountId>() {
            Ok(id) => return Some(id),
            Err(_) => println!("Please enter an account ID."),
        }
    }
}
