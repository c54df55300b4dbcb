// src/fetch/urls.rs
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use url::Url;

/// Release directory holding the monthly yellow trip files.
pub static TRIP_DATA_PREFIX: &str =
    "https://github.com/DataTalksClub/nyc-tlc-data/releases/download/yellow/";

/// The taxi zone lookup table (~263 rows).
pub static ZONES_URL: &str = "https://d37ci6vzurychx.cloudfront.net/misc/taxi_zone_lookup.csv";

/// Build the URL of the gzip'd trip CSV for `year`/`month` under `prefix`.
pub fn trip_data_url(prefix: &str, year: i32, month: u32) -> Result<Url> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        bail!("no such month: {}-{}", year, month);
    }
    if !(0..=9999).contains(&year) {
        bail!("year {} does not fit in four digits", year);
    }

    let raw = format!("{}yellow_tripdata_{:04}-{:02}.csv.gz", prefix, year, month);
    Url::parse(&raw).with_context(|| format!("parsing trip data URL {}", raw))
}
