// src/export.rs

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Check that the month argument is an integer; the argument text itself is
/// what ends up in the file name.
pub fn parse_month(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("month `{}` is not an integer", raw))
}

/// `output_month_<month>.parquet`, with `month` exactly as given.
pub fn output_file_name(month: &str) -> String {
    format!("output_month_{}.parquet", month)
}

/// The fixed two-row table the exporter writes.
pub fn passenger_table() -> Result<RecordBatch> {
    let schema = Arc::new(ArrowSchema::new(vec![
        Field::new("Day", DataType::Int64, false),
        Field::new("No.of passengers", DataType::Int64, false),
    ]));

    Ok(RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
            Arc::new(Int64Array::from(vec![3, 4])) as ArrayRef,
        ],
    )?)
}

/// Write the passenger table for `month` into `out_dir` and return the path.
pub fn write_month(out_dir: &Path, month: &str) -> Result<PathBuf> {
    parse_month(month)?;
    let batch = passenger_table()?;
    info!("\n{}", pretty_format_batches(std::slice::from_ref(&batch))?);

    let out_path = out_dir.join(output_file_name(month));
    let temp_path = out_path.with_extension("tmp");

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let file = File::create(&temp_path)
        .with_context(|| format!("creating {}", temp_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    fs::rename(&temp_path, &out_path).with_context(|| {
        format!(
            "renaming {} -> {}",
            temp_path.display(),
            out_path.display()
        )
    })?;

    info!(path = %out_path.display(), rows = batch.num_rows(), "wrote parquet");
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::Int64Type;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    #[test]
    fn month_three_writes_one_file_with_both_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_month(dir.path(), "3")?;

        assert_eq!(path.file_name().unwrap(), "output_month_3.parquet");
        let entries: Vec<_> = fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
        assert_eq!(entries.len(), 1);

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 2);

        let batch = &batches[0];
        assert_eq!(batch.schema().field(0).name(), "Day");
        assert_eq!(batch.schema().field(1).name(), "No.of passengers");
        let day = batch.column(0).as_primitive::<Int64Type>();
        let passengers = batch.column(1).as_primitive::<Int64Type>();
        assert_eq!(day.values().to_vec(), vec![1, 2]);
        assert_eq!(passengers.values().to_vec(), vec![3, 4]);
        Ok(())
    }

    #[test]
    fn file_name_keeps_the_argument_text() -> Result<()> {
        assert_eq!(output_file_name("03"), "output_month_03.parquet");

        let dir = tempfile::tempdir()?;
        let path = write_month(dir.path(), "03")?;
        assert_eq!(path, dir.path().join("output_month_03.parquet"));
        assert!(path.is_file());
        Ok(())
    }

    #[test]
    fn non_numeric_month_writes_nothing() -> Result<()> {
        assert_eq!(parse_month("03")?, 3);
        assert!(parse_month("march").is_err());

        let dir = tempfile::tempdir()?;
        assert!(write_month(dir.path(), "march").is_err());
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn output_is_deterministic() -> Result<()> {
        let a = tempfile::tempdir()?;
        let b = tempfile::tempdir()?;
        let first = fs::read(write_month(a.path(), "7")?)?;
        let second = fs::read(write_month(b.path(), "7")?)?;
        assert_eq!(first, second);
        Ok(())
    }
}
