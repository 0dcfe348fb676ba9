//! SQL dump reading: table, column, and primary key metadata from DDL.

mod dialect;
mod lexer;
mod parser;
mod types;

pub use dialect::Dialect;
pub use parser::{SqlParseError, parse_sql};
pub use types::{ColumnType, UNBOUNDED, map_type};
