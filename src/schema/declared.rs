use anyhow::{Context, Result};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::arrow::{map_to_arrow_type, timestamp_type};

/// Column types for the yellow trip CSV, keyed by header name.
static TRIP_DTYPES: &[(&str, DataType)] = &[
    ("VendorID", DataType::Int64),
    ("passenger_count", DataType::Int64),
    ("trip_distance", DataType::Float64),
    ("RatecodeID", DataType::Int64),
    ("store_and_fwd_flag", DataType::Utf8),
    ("PULocationID", DataType::Int64),
    ("DOLocationID", DataType::Int64),
    ("payment_type", DataType::Int64),
    ("fare_amount", DataType::Float64),
    ("extra", DataType::Float64),
    ("mta_tax", DataType::Float64),
    ("tip_amount", DataType::Float64),
    ("tolls_amount", DataType::Float64),
    ("improvement_surcharge", DataType::Float64),
    ("total_amount", DataType::Float64),
    ("congestion_surcharge", DataType::Float64),
];

static TRIP_PARSE_DATES: &[&str] = &["tpep_pickup_datetime", "tpep_dropoff_datetime"];

/// A declared column-type mapping plus the columns to read as timestamps.
///
/// Header columns the mapping does not name are read as nullable strings,
/// so the schema resolved for a given header never depends on the data.
#[derive(Debug, Clone, Default)]
pub struct DeclaredSchema {
    types: HashMap<String, DataType>,
    timestamps: HashSet<String>,
}

impl DeclaredSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapping used for the monthly yellow trip files.
    pub fn trips() -> Self {
        let mut declared = Self::new();
        for (name, dt) in TRIP_DTYPES {
            declared = declared.with_data_type(name, dt.clone());
        }
        for &name in TRIP_PARSE_DATES {
            declared = declared.with_timestamp(name);
        }
        declared
    }

    /// Declare `column` by type name, see [`map_to_arrow_type`].
    pub fn with_type(self, column: &str, ty: &str) -> Result<Self> {
        let dt = map_to_arrow_type(ty).with_context(|| format!("column `{}`", column))?;
        Ok(self.with_data_type(column, dt))
    }

    pub fn with_data_type(mut self, column: &str, dt: DataType) -> Self {
        self.types.insert(column.to_string(), dt);
        self
    }

    pub fn with_timestamp(mut self, column: &str) -> Self {
        self.timestamps.insert(column.to_string());
        self
    }

    /// Resolve the Arrow schema for a file whose header is `header`.
    /// Timestamp columns win over an explicit type for the same name.
    pub fn resolve(&self, header: &[String]) -> Arc<ArrowSchema> {
        let fields: Vec<Field> = header
            .iter()
            .map(|name| {
                let dt = if self.timestamps.contains(name) {
                    timestamp_type()
                } else {
                    self.types.get(name).cloned().unwrap_or(DataType::Utf8)
                };
                Field::new(name, dt, /* nullable = */ true)
            })
            .collect();

        Arc::new(ArrowSchema::new(fields))
    }
}

/// Split one CSV header line into column names.
pub fn parse_header_line(line: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(line.as_bytes());
    let record = reader
        .records()
        .next()
        .context("empty header line")?
        .context("parsing header line")?;

    Ok(record.iter().map(|s| s.trim().to_string()).collect())
}
