//! Planwatch CLI - live dashboard over `terraform apply -json` output

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tokio::sync::mpsc;

use planwatch::controller::{spawn_ticker, ControlEvent, Dashboard, Outcome};
use planwatch::error::PlanwatchError;
use planwatch::export::to_csv;
use planwatch::plain::PlainSink;
use planwatch::reader::{spawn_source, JsonLineReader};
use planwatch::tui;

#[derive(Parser)]
#[command(name = "planwatch")]
#[command(about = "Live terminal dashboard for Terraform/OpenTofu JSON log streams")]
#[command(version)]
struct Cli {
    /// JSON log file to read; reads stdin when omitted
    input: Option<PathBuf>,

    /// Copy every raw input line to this file, before any decoding
    #[arg(long, value_name = "FILE")]
    tee: Option<PathBuf>,

    /// Export finished operations as CSV to this file on exit
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Line-oriented output instead of the interactive dashboard
    /// (automatic when stdout is not a terminal)
    #[arg(long)]
    plain: bool,

    /// Write structured logs to this file (stderr would fight the dashboard)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log filter for --log-file, e.g. "info" or "planwatch=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    match run(cli).await {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Interrupted) => std::process::exit(130),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), PlanwatchError> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(cli: Cli) -> Result<Outcome, PlanwatchError> {
    let (tx, mut rx) = mpsc::channel::<ControlEvent>(256);

    let tee: Option<Box<dyn Write + Send>> = match &cli.tee {
        Some(path) => Some(Box::new(File::create(path)?)),
        None => None,
    };

    match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            let mut reader = JsonLineReader::new(file);
            if let Some(tee) = tee {
                reader = reader.with_tee(tee);
            }
            spawn_source(reader, tx.clone());
        }
        None => {
            let mut reader = JsonLineReader::new(tokio::io::stdin());
            if let Some(tee) = tee {
                reader = reader.with_tee(tee);
            }
            spawn_source(reader, tx.clone());
        }
    }

    spawn_ticker(tx.clone());

    let mut dashboard = Dashboard::new();
    let plain = cli.plain || !io::stdout().is_terminal();

    let outcome = if plain {
        // No raw-mode terminal to deliver key events; translate the
        // process-level interrupt instead.
        let interrupt_tx = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = interrupt_tx.send(ControlEvent::UserInterrupt).await;
            }
        });
        drop(tx);

        let mut sink = PlainSink::new(io::stdout());
        dashboard.run(&mut rx, &mut sink).await?
    } else {
        tui::run(&mut dashboard, rx, tx).await?
    };

    if let Some(path) = &cli.csv {
        let csv = to_csv(dashboard.refresh_ops(), dashboard.apply_ops());
        std::fs::write(path, csv)?;
    }

    Ok(outcome)
}
