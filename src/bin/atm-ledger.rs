use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use atm_ledger::{
    bin_utils::{Service, SessionConfig},
    credential::Pin,
};
use clap::Parser;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Single account ATM simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PIN the account is opened with
    #[arg(long, default_value = "1234")]
    pin: String,

    /// Opening balance
    #[arg(long, default_value = "10000.00")]
    balance: Decimal,

    /// Run the requests of a CSV script (op,amount,pin,new_pin) instead of the menu
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log filter, logs go to stderr
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig {
        pin: Pin::new(cli.pin),
        opening_balance: cli.balance,
    };

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open `{}`", path.display()))?;
            let service = Service {
                input: BufReader::new(file),
                output: &mut std::io::stdout(),
                config,
            };
            service.run_script(|line, err| eprintln!("Error at line {line}: {err:#}"))
        }
        None => {
            let service = Service {
                input: std::io::stdin().lock(),
                output: &mut std::io::stdout(),
                config,
            };
            service.run()
        }
    }
}
