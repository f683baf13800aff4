mod config;
mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use raffle_core::{RaffleEngine, RaffleSession, RosterStore, SystemClock};
use storage::FileStore;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::{execute, on_tick, parse_command, wait_for_deadline, Outcome};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "raffle.toml")]
    config: PathBuf,
    #[arg(long)]
    storage_path: Option<PathBuf>,
    #[arg(long)]
    storage_key: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(&args.config);
    if let Some(path) = args.storage_path {
        settings.storage_path = path;
    }
    if let Some(key) = args.storage_key {
        settings.storage_key = key;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::open(&settings.storage_path).with_context(|| {
        format!(
            "failed to open roster file {}",
            settings.storage_path.display()
        )
    })?;
    let mut session = RaffleSession::with_parts(
        RosterStore::with_key(store, settings.storage_key.clone()),
        RaffleEngine::new(),
        SystemClock,
        settings.timings(),
    );
    let loaded = session.initialize();
    info!(
        path = %settings.storage_path.display(),
        key = %settings.storage_key,
        employees = loaded,
        "raffle console ready"
    );
    println!("Employee Raffle. {loaded} employees loaded. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = session.next_deadline().map(Instant::from_std);
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match execute(&mut session, command) {
                        Outcome::Continue(output) => print_lines(&output),
                        Outcome::Quit => break,
                    },
                    Err(usage) => print!("{usage}"),
                }
            }
            _ = wait_for_deadline(deadline) => {
                print_lines(&on_tick(&mut session));
            }
        }
    }

    session.shutdown();
    info!("raffle console closed");
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
