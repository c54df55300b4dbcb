use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use taxi_ingest::{
    fetch::{self, urls},
    ingest, logging, Destination, PgConfig, Target,
};
use tracing::info;
use url::Url;

/// Stream a month of NYC yellow-taxi trips, then the zone lookup, into a
/// database.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Postgres user name
    #[arg(long, env = "PG_USER", default_value = "root")]
    pg_user: String,

    /// Postgres password
    #[arg(long, env = "PG_PASS", default_value = "root", hide_env_values = true)]
    pg_pass: String,

    /// Postgres host
    #[arg(long, env = "PG_HOST", default_value = "localhost")]
    pg_host: String,

    /// Postgres database name
    #[arg(long, env = "PG_DB", default_value = "ny_taxi")]
    pg_db: String,

    /// Postgres port
    #[arg(long, env = "PG_PORT", default_value_t = 5432)]
    pg_port: u16,

    /// Data year
    #[arg(long, env = "TAXI_YEAR", default_value_t = 2021)]
    year: i32,

    /// Data month
    #[arg(long, env = "TAXI_MONTH", default_value_t = 1)]
    month: u32,

    /// Target table name for trips
    #[arg(long, env = "TARGET_TABLE", default_value = "yellow_taxi_data")]
    target_table: String,

    /// Target table name for the zone lookup
    #[arg(long, env = "ZONES_TABLE", default_value = "zones")]
    zones_table: String,

    /// CSV rows per batch
    #[arg(long, env = "CHUNKSIZE", default_value_t = 100_000)]
    chunksize: usize,

    /// Directory the monthly trip files are published under
    #[arg(long, env = "URL_PREFIX", default_value = urls::TRIP_DATA_PREFIX)]
    url_prefix: String,

    /// Write into this local DuckDB file instead of Postgres
    #[arg(long, env = "DUCKDB_PATH")]
    duckdb: Option<PathBuf>,
}

impl Args {
    fn target(&self) -> Target {
        match &self.duckdb {
            Some(path) => Target::DuckDb(path.clone()),
            None => Target::Postgres(PgConfig {
                user: self.pg_user.clone(),
                password: self.pg_pass.clone(),
                host: self.pg_host.clone(),
                port: self.pg_port,
                database: self.pg_db.clone(),
            }),
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    info!("startup");

    let args = Args::parse();
    let trips_url = urls::trip_data_url(&args.url_prefix, args.year, args.month)?;
    let zones_url = Url::parse(urls::ZONES_URL)?;
    let client = fetch::client()?;

    let mut dest = Destination::open(&args.target())?;

    // ─── 1) trips, streamed in batches ──────────────────────────────
    let start = Instant::now();
    let summary = ingest::load_trips(
        &client,
        &mut dest,
        &trips_url,
        &args.target_table,
        args.chunksize,
    )?;
    info!(table = %args.target_table, %summary, elapsed = ?start.elapsed(), "trips ingestion finished");

    // ─── 2) zones, replaced wholesale ───────────────────────────────
    let rows = ingest::load_zones(&client, &mut dest, &zones_url, &args.zones_table)?;
    info!(table = %args.zones_table, rows, "zones table loaded");

    dest.close()?;
    info!("all done");
    Ok(())
}
