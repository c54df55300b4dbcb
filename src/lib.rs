pub mod db;
pub mod export;
pub mod fetch;
pub mod ingest;
pub mod logging;
pub mod schema;

pub use db::{Destination, PgConfig, Target};
pub use ingest::LoadSummary;
