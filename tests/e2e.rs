use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Drive the binary through a scripted menu session against `datafile`.
fn run_session(datafile: &Path, script: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_finance-buddy"))
        .arg(datafile)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run binary");

    child
        .stdin
        .take()
        .expect("stdin not piped")
        .write_all(script.as_bytes())
        .expect("failed to write script");

    let output = child.wait_with_output().expect("failed to wait for binary");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn create_deposit_undo_session() {
    let dir = tempfile::tempdir().unwrap();
    let datafile = dir.path().join("finance_data.txt");

    // create Alice(100), deposit 50, overdraw, undo the deposit, list,
    // view transactions, exit
    let stdout = run_session(
        &datafile,
        "1\nAlice\n100\n3\n1\n50\n4\n1\n200\n7\n2\n6\n1\n0\n",
    );

    assert!(stdout.contains("Created account Alice with ID 1"));
    assert!(stdout.contains("Deposited 50.00 to account 1"));
    assert!(stdout.contains("Cannot withdraw: insufficient funds in account 1"));
    assert!(stdout.contains("undid deposit of 50.00 from account 1"));
    assert!(stdout.contains("ID:1  Name:Alice  Balance:100.00"));
    assert!(stdout.contains("UNDO_DEPOSIT 50.00"));
    assert!(stdout.contains("Data saved to"));
}

#[test]
fn data_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let datafile = dir.path().join("finance_data.txt");

    run_session(&datafile, "1\nAlice\n250\n0\n");
    let stdout = run_session(&datafile, "2\n0\n");

    assert!(stdout.contains("Loaded existing data from"));
    assert!(stdout.contains("ID:1  Name:Alice  Balance:250.00"));
    // history is not undoable in a fresh process
    let stdout = run_session(&datafile, "7\n0\n");
    assert!(stdout.contains("Nothing to undo."));
}

#[test]
fn transfer_and_undo_session() {
    let dir = tempfile::tempdir().unwrap();
    let datafile = dir.path().join("finance_data.txt");

    // two accounts, transfer 40, undo it, transfer to self rejected
    let stdout = run_session(
        &datafile,
        "1\nAlice\n100\n1\nBob\n0\n5\n1\n2\n40\n7\n5\n1\n1\n10\n2\n0\n",
    );

    assert!(stdout.contains("Transferred 40.00 from account 1 to account 2"));
    assert!(stdout.contains("undid transfer of 40.00 from account 1 to account 2"));
    assert!(stdout.contains("Cannot transfer: source and destination are the same account (1)"));
    assert!(stdout.contains("ID:1  Name:Alice  Balance:100.00"));
    assert!(stdout.contains("ID:2  Name:Bob  Balance:0.00"));
}

#[test]
fn invalid_input_reprompts() {
    let dir = tempfile::tempdir().unwrap();
    let datafile = dir.path().join("finance_data.txt");

    let stdout = run_session(&datafile, "42\n3\nnot-a-number\n1\nabc\n5\n0\n");

    assert!(stdout.contains("Invalid choice."));
    assert!(stdout.contains("Please enter an account ID."));
    assert!(stdout.contains("Please enter a numeric amount."));
    // account 1 does not exist yet
    assert!(stdout.contains("Cannot deposit: account 1 not found"));
}
