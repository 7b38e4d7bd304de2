use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::time::Duration;

mod client;
mod processes;
mod report;
mod watch;

use client::VitalsClient;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal client for vitalsd")]
struct Args {
    /// Base URL of the vitalsd service
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Disable colorized output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Show recorded history
    History {
        /// Most recent points to show (defaults to the whole ring)
        #[arg(long, allow_negative_numbers = true)]
        points: Option<i64>,
    },
    /// List the top processes
    Processes {
        /// Sort key: cpu or memory
        #[arg(long, default_value = "cpu")]
        sort: String,
        /// Number of processes
        #[arg(short = 'n', default_value_t = 5)]
        n: usize,
    },
    /// Per-drive usage
    Disk,
    /// Per-interface byte counters
    Network,
    /// Poll metrics and show per-interface rates
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 2)]
        interval: u64,
        /// Stop after this many samples
        #[arg(long)]
        count: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }
    if let Err(err) = run(args).await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let client = VitalsClient::new(&args.url);

    match args.command {
        None => {
            let metrics = client.metrics().await?;
            report::print_summary(&metrics);
        }
        Some(Command::History { points }) => {
            let history = client.history(points).await?;
            report::print_history(&history);
        }
        Some(Command::Processes { sort, n }) => {
            let procs = client.processes(&sort, n).await?;
            processes::print_processes(&procs);
        }
        Some(Command::Disk) => {
            let drives = client.disk().await?;
            report::print_drives(&drives);
        }
        Some(Command::Network) => {
            let interfaces = client.network().await?;
            report::print_interfaces(&interfaces);
        }
        Some(Command::Watch { interval, count }) => {
            let interval = Duration::from_secs(interval.max(1));
            watch::run_watch(&client, interval, count).await?;
        }
    }
    Ok(())
}
