// src/ingest/mod.rs
use anyhow::Result;
use reqwest::blocking::Client;
use std::fmt;
use url::Url;

use crate::db::Destination;
use crate::fetch;
use crate::schema::DeclaredSchema;

pub mod chunked;
pub mod lookup;

pub use chunked::{append_chunks, ingest_chunked, prepare_table};
pub use lookup::load_lookup;

/// What a chunked load wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Committed write operations, one per batch.
    pub batches: usize,
    pub rows: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows in {} batches", self.rows, self.batches)
    }
}

/// Stream the trip CSV at `url` into `table`, `batch_size` rows at a time.
pub fn load_trips(
    client: &Client,
    dest: &mut Destination,
    url: &Url,
    table: &str,
    batch_size: usize,
) -> Result<LoadSummary> {
    let reader = fetch::open_stream(client, url)?;
    ingest_chunked(dest, reader, &DeclaredSchema::trips(), table, batch_size)
}

/// Fetch the zone lookup CSV at `url` and replace `table` with it.
pub fn load_zones(client: &Client, dest: &mut Destination, url: &Url, table: &str) -> Result<usize> {
    let body = fetch::fetch_bytes(client, url)?;
    load_lookup(dest, &body, table)
}
