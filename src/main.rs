//! Level 2 Book - Replay Binary
//!
//! Reads compact events (`N#B:1.00:1000:10`, `C#10`, `R#1.00:600:12`,
//! `T#600:10`), one per line, from a file or stdin, applies them to an
//! `OrderBookEngine` and prints the resulting top of book per side.
//!
//! Log level comes from `RUST_LOG` (default `info`).

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use level2_book::{BookConfig, BookEvent, Level2View, OrderBookEngine, Side};

/// Replay order events into a Level 2 book
#[derive(Debug, Parser)]
#[command(name = "level2-replay", version, about)]
struct Args {
    /// Event file, one event per line. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Stop at the first rejected or unparsable event
    #[arg(long)]
    strict: bool,

    /// Check book invariants after every event
    #[arg(long)]
    verify: bool,

    /// Resting orders to pre-allocate room for
    #[arg(long, default_value_t = BookConfig::DEFAULT_ORDER_CAPACITY)]
    capacity: usize,
}

/// Counters for one replay run
#[derive(Debug, Default)]
struct ReplayStats {
    applied: u64,
    rejected: u64,
    unparsable: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = BookConfig::default()
        .with_order_capacity(args.capacity)
        .with_verify_invariants(args.verify);
    let mut book = OrderBookEngine::with_config(config);

    match run(&args, &mut book) {
        Ok(stats) => {
            info!(
                applied = stats.applied,
                rejected = stats.rejected,
                unparsable = stats.unparsable,
                "replay finished"
            );
            print_summary(&book);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "replay aborted");
            print_summary(&book);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, book: &mut OrderBookEngine) -> Result<ReplayStats, Box<dyn Error>> {
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut stats = ReplayStats::default();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = n + 1;

        let event = match line.parse::<BookEvent>() {
            Ok(event) => event,
            Err(err) if !args.strict => {
                warn!(line_no, error = %err, "skipping line");
                stats.unparsable += 1;
                continue;
            }
            Err(err) => return Err(format!("line {line_no}: {err}").into()),
        };

        match book.apply(&event) {
            Ok(_) => stats.applied += 1,
            Err(err) if err.is_rejection() && !args.strict => {
                warn!(line_no, %event, error = %err, "event rejected");
                stats.rejected += 1;
            }
            Err(err) => return Err(format!("line {line_no}: {event}: {err}").into()),
        }
    }
    Ok(stats)
}

fn print_summary(book: &OrderBookEngine) {
    println!("===========================================");
    println!("  Level 2 Book");
    println!("===========================================");
    println!("  Resting orders: {}", book.order_count());
    for side in Side::ALL {
        match book.top_of_book(side) {
            Some(price) => println!(
                "  {side}: top {price} size {} depth {}",
                book.size_for_price_level(side, price),
                book.book_depth(side)
            ),
            None => println!("  {side}: no book"),
        }
    }
    if let Some(spread) = book.spread() {
        println!("  Spread: {spread}");
    }
}
