pub mod arrow;
pub mod declared;

pub use self::arrow::{map_to_arrow_type, sql_type, timestamp_type};
pub use self::declared::{parse_header_line, DeclaredSchema};
