// src/schema/arrow.rs

use anyhow::{bail, Result};
use arrow::datatypes::{DataType, TimeUnit};

/// Map a declared column type name into an Arrow DataType.
///
/// Names are matched case-insensitively and follow the dataframe-style
/// spellings used for the trip mapping:
/// - INT64, INT32, INT16, INT8 → signed integer of that width
/// - FLOAT64, DOUBLE           → Float64
/// - FLOAT32, FLOAT            → Float32
/// - BOOL, BOOLEAN             → Boolean
/// - STRING, STR, UTF8         → Utf8
/// - DATE                      → Date32
/// - DATETIME, TIMESTAMP       → Timestamp(µs, no zone)
pub fn map_to_arrow_type(ty: &str) -> Result<DataType> {
    let dt = match ty.to_ascii_uppercase().as_str() {
        "INT64" => DataType::Int64,
        "INT32" => DataType::Int32,
        "INT16" => DataType::Int16,
        "INT8" => DataType::Int8,
        "FLOAT64" | "DOUBLE" => DataType::Float64,
        "FLOAT32" | "FLOAT" => DataType::Float32,
        "BOOL" | "BOOLEAN" => DataType::Boolean,
        "STRING" | "STR" | "UTF8" => DataType::Utf8,
        "DATE" => DataType::Date32,
        "DATETIME" | "TIMESTAMP" => timestamp_type(),
        other => bail!("unsupported column type `{}`", other),
    };
    Ok(dt)
}

/// The type every `parse_dates` column is read as.
pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, None)
}

/// SQL column type for an Arrow type, as understood by DuckDB and by the
/// Postgres scanner.
pub fn sql_type(dt: &DataType) -> Result<&'static str> {
    let ty = match dt {
        DataType::Int8 => "TINYINT",
        DataType::Int16 => "SMALLINT",
        DataType::Int32 => "INTEGER",
        DataType::Int64 => "BIGINT",
        DataType::Float32 => "FLOAT",
        DataType::Float64 => "DOUBLE",
        DataType::Boolean => "BOOLEAN",
        DataType::Utf8 | DataType::LargeUtf8 => "VARCHAR",
        DataType::Date32 => "DATE",
        DataType::Timestamp(_, None) => "TIMESTAMP",
        DataType::Timestamp(_, Some(_)) => "TIMESTAMPTZ",
        other => bail!("no SQL mapping for Arrow type {:?}", other),
    };
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_names_are_case_insensitive() -> Result<()> {
        assert_eq!(map_to_arrow_type("Int64")?, DataType::Int64);
        assert_eq!(map_to_arrow_type("float64")?, DataType::Float64);
        assert_eq!(map_to_arrow_type("string")?, DataType::Utf8);
        assert_eq!(map_to_arrow_type("datetime")?, timestamp_type());
        Ok(())
    }

    #[test]
    fn unknown_declared_type_is_rejected() {
        assert!(map_to_arrow_type("decimal(10,2)").is_err());
    }

    #[test]
    fn sql_types_cover_trip_columns() -> Result<()> {
        assert_eq!(sql_type(&DataType::Int64)?, "BIGINT");
        assert_eq!(sql_type(&DataType::Float64)?, "DOUBLE");
        assert_eq!(sql_type(&DataType::Utf8)?, "VARCHAR");
        assert_eq!(sql_type(&timestamp_type())?, "TIMESTAMP");
        assert!(sql_type(&DataType::Binary).is_err());
        Ok(())
    }
}
