mod args;
mod batch;
mod decode;
mod error;
mod extract;
mod gmail;
mod report;
mod retrieve;
mod run;
mod utils;

use crate::args::Args;
use crate::batch::DateRange;
use crate::gmail::GmailClient;
use anyhow::{ensure, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    do_main(&Args::parse())
}

fn do_main(args: &Args) -> Result<()> {
    init_tracing();
    ensure!(
        args.start < args.end,
        "start date {} is not before end date {}",
        args.start.format("%d/%m/%Y"),
        args.end.format("%d/%m/%Y"),
    );

    let mailbox = GmailClient::new(args.access_token.clone())?;
    let range = DateRange {
        start: args.start,
        end: args.end,
    };
    run::run(
        &mailbox,
        range,
        args.months_per_batch,
        args.max_results,
        &args.out_dir,
        args.quiet,
    )
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}
