// src/ingest/chunked.rs

use anyhow::{bail, Context, Result};
use arrow::csv::ReaderBuilder;
use arrow::datatypes::Schema as ArrowSchema;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

use super::LoadSummary;
use crate::db::Destination;
use crate::schema::{parse_header_line, DeclaredSchema};

/// Load a CSV stream into `table` in two phases: resolve the schema from the
/// header and (re)create the table, then append `batch_size`-row batches.
///
/// Fails fast: the first batch with a value that does not coerce to its
/// declared type aborts the load. Batches before it stay committed.
#[instrument(level = "info", skip(dest, reader, declared))]
pub fn ingest_chunked<R: BufRead>(
    dest: &mut Destination,
    mut reader: R,
    declared: &DeclaredSchema,
    table: &str,
    batch_size: usize,
) -> Result<LoadSummary> {
    if batch_size == 0 {
        bail!("batch size must be at least one row");
    }
    let start = Instant::now();

    let schema = prepare_table(dest, &mut reader, declared, table)?;
    let summary = append_chunks(dest, reader, schema, table, batch_size)?;

    info!(%summary, elapsed = ?start.elapsed(), "ingest finished");
    Ok(summary)
}

/// Consume the header line from `reader`, resolve it against `declared`
/// and replace `table` with an empty table of that shape.
pub fn prepare_table<R: BufRead>(
    dest: &mut Destination,
    reader: &mut R,
    declared: &DeclaredSchema,
    table: &str,
) -> Result<Arc<ArrowSchema>> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("reading CSV header line")?;
    if read == 0 {
        bail!("source for {} is empty, expected a header line", table);
    }

    let header = parse_header_line(&line)?;
    let schema = declared.resolve(&header);
    dest.create_table(table, &schema)?;
    info!(table, columns = header.len(), "created destination table");

    Ok(schema)
}

/// Append the header-less CSV rows in `reader` to `table`, one transaction
/// per batch of at most `batch_size` rows.
pub fn append_chunks<R: BufRead>(
    dest: &mut Destination,
    reader: R,
    schema: Arc<ArrowSchema>,
    table: &str,
    batch_size: usize,
) -> Result<LoadSummary> {
    if batch_size == 0 {
        bail!("batch size must be at least one row");
    }

    let csv_reader = ReaderBuilder::new(schema)
        .with_header(false)
        .with_batch_size(batch_size)
        .build_buffered(reader)
        .context("creating CSV reader")?;

    let mut summary = LoadSummary::default();
    for (batch_idx, batch_res) in csv_reader.enumerate() {
        let batch = batch_res
            .with_context(|| format!("parsing batch {} for {}", batch_idx, table))?;

        let start = Instant::now();
        let rows = dest.append_batch(table, &batch)?;
        summary.batches += 1;
        summary.rows += rows;

        debug!(batch = batch_idx, rows, elapsed = ?start.elapsed(), "batch committed");
        info!(table, batch = batch_idx, total_rows = summary.rows, "ingesting trips");
    }

    Ok(summary)
}
