// src/ingest/lookup.rs

use anyhow::{Context, Result};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::Destination;

/// Replace `table` with the rows of the small CSV `body`.
///
/// The schema is inferred from the whole body and every row is parsed
/// before the database is touched; the swap itself is one transaction.
#[instrument(level = "info", skip(dest, body), fields(bytes = body.len()))]
pub fn load_lookup(dest: &mut Destination, body: &[u8], table: &str) -> Result<usize> {
    let format = Format::default().with_header(true);
    let (schema, records) = format
        .infer_schema(Cursor::new(body), None)
        .with_context(|| format!("inferring schema for {}", table))?;
    let schema = Arc::new(schema);

    let batches = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(Cursor::new(body))
        .context("creating CSV reader")?
        .collect::<Result<Vec<RecordBatch>, _>>()
        .with_context(|| format!("parsing rows for {}", table))?;

    let rows = dest.replace_table(table, &schema, &batches)?;
    info!(table, rows, inferred_from = records, "lookup table replaced");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES: &str = "\"LocationID\",\"Borough\",\"Zone\",\"service_zone\"\n\
        1,\"EWR\",\"Newark Airport\",\"EWR\"\n\
        2,\"Queens\",\"Jamaica Bay\",\"Boro Zone\"\n\
        3,\"Bronx\",\"Allerton/Pelham Gardens\",\"Boro Zone\"\n\
        264,\"Unknown\",,\n";

    #[test]
    fn loads_all_rows_with_inferred_types() -> Result<()> {
        let mut dest = Destination::open_in_memory()?;
        assert_eq!(load_lookup(&mut dest, ZONES.as_bytes(), "zones")?, 4);
        assert_eq!(dest.row_count("zones")?, 4);

        let cols = dest.columns("zones")?;
        assert_eq!(cols[0], ("LocationID".to_string(), "BIGINT".to_string()));
        assert_eq!(cols[1], ("Borough".to_string(), "VARCHAR".to_string()));
        assert_eq!(cols.len(), 4);
        Ok(())
    }

    #[test]
    fn reload_is_idempotent() -> Result<()> {
        let mut dest = Destination::open_in_memory()?;
        load_lookup(&mut dest, ZONES.as_bytes(), "zones")?;
        let columns = dest.columns("zones")?;
        let rows = dest.rows_as_text("zones")?;

        load_lookup(&mut dest, ZONES.as_bytes(), "zones")?;
        assert_eq!(dest.columns("zones")?, columns);
        assert_eq!(dest.rows_as_text("zones")?, rows);

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[0],
            vec![
                Some("1".to_string()),
                Some("EWR".to_string()),
                Some("Newark Airport".to_string()),
                Some("EWR".to_string()),
            ]
        );
        let unknown = rows
            .iter()
            .find(|r| r[0].as_deref() == Some("264"))
            .expect("row 264 loaded");
        assert_eq!(unknown[2], None);
        Ok(())
    }

    #[test]
    fn failed_reload_keeps_previous_table() -> Result<()> {
        let mut dest = Destination::open_in_memory()?;
        load_lookup(&mut dest, ZONES.as_bytes(), "zones")?;

        let broken = "LocationID,Borough\n1,EWR\n2,Queens,extra,fields\n";
        assert!(load_lookup(&mut dest, broken.as_bytes(), "zones").is_err());

        assert_eq!(dest.row_count("zones")?, 4);
        assert_eq!(dest.columns("zones")?.len(), 4);
        assert_eq!(dest.rows_as_text("zones")?[1][1], Some("Queens".to_string()));
        Ok(())
    }

    #[test]
    fn empty_body_is_an_error() -> Result<()> {
        let mut dest = Destination::open_in_memory()?;
        assert!(load_lookup(&mut dest, b"", "zones").is_err());
        Ok(())
    }
}
