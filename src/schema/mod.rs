//! Relational schema metadata consumed by the generators.

mod memory;

pub use memory::InMemorySchema;

use std::fmt;

use crate::sql::SqlParseError;
use crate::typemap::SqlType;

/// Identifies one table of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.into(),
        }
    }

    /// Name prefixed with its schema, when one is known.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Column metadata as reported by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Physical column name.
    pub name: String,

    /// Relational type code (see [`SqlType::code`]).
    pub type_code: i32,

    /// Declared size: character length, or precision for numeric types.
    pub size: u32,

    /// Whether the column allows NULL.
    pub nullable: bool,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, sql_type: SqlType, size: u32, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_code: sql_type.code(),
            size,
            nullable,
        }
    }

    pub fn sql_type(&self) -> Option<SqlType> {
        SqlType::from_code(self.type_code)
    }
}

/// Full metadata of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    pub table: TableRef,

    /// Columns in retrieval order.
    pub columns: Vec<ColumnMeta>,

    /// Primary key column names in retrieval order.
    pub primary_key: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Schema dump error: {0}")]
    Dump(#[from] SqlParseError),
    #[error("Schema source error: {0}")]
    Source(String),
}

/// Source of table, column, and primary key metadata.
pub trait SchemaIntrospector {
    fn tables(&self) -> Result<Vec<TableRef>, IntrospectError>;

    /// Columns of `table` in retrieval order.
    fn columns(&self, table: &TableRef) -> Result<Vec<ColumnMeta>, IntrospectError>;

    /// Primary key column names of `table` in retrieval order.
    fn primary_keys(&self, table: &TableRef) -> Result<Vec<String>, IntrospectError>;
}
