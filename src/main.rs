//! Ledger Engine CLI
//!
//! Replays a CSV scenario of ledger operations and prints the final account
//! states.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- scenario.csv > accounts.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use ledger_engine::{script, Ledger, LedgerError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let scenario_path = &args[1];
    let file = File::open(scenario_path)?;
    let reader = BufReader::new(file);

    let mut ledger = Ledger::new();
    script::run(&mut ledger, reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    ledger.write_report(handle)?;

    Ok(())
}
