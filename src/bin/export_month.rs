use anyhow::Result;
use clap::Parser;
use std::path::Path;
use taxi_ingest::{export, logging};
use tracing::info;

/// Write a tiny passenger table to `output_month_<MONTH>.parquet`.
#[derive(Parser, Debug)]
struct Args {
    /// Month embedded into the output file name, as typed
    month: String,
}

fn main() -> Result<()> {
    logging::init();

    let argv: Vec<String> = std::env::args().collect();
    info!(?argv, "arguments");

    let args = Args::parse();
    let month = export::parse_month(&args.month)?;
    info!("hello pipeline, month = {}", month);

    let path = export::write_month(Path::new("."), &args.month)?;
    info!(path = %path.display(), "done");
    Ok(())
}
