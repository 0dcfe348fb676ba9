//! SQL type text to relational type code mapping.

use super::Dialect;
use crate::typemap::SqlType;

/// Declared size used for types without a length limit.
pub const UNBOUNDED: u32 = i32::MAX as u32;

/// Resolved type of a column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub sql_type: SqlType,
    pub size: u32,
}

/// Map a SQL type as written in DDL (e.g. `VARCHAR(50)`, `numeric(10,2)`) to a type code and size.
pub fn map_type(sql_type: &str, dialect: Dialect) -> ColumnType {
    let lower = sql_type.to_lowercase();
    let (base, args) = split_args(&lower);
    let base = base
        .trim()
        .trim_end_matches(" unsigned")
        .trim_end_matches(" zerofill")
        .trim();

    let sql_type = if base.ends_with("[]") {
        SqlType::Array
    } else {
        match dialect {
            Dialect::PostgreSQL => map_postgres_type(base),
            Dialect::MySQL => map_mysql_type(base, &args),
            _ => map_generic_type(base),
        }
    };

    let size = args.first().copied().unwrap_or_else(|| default_size(sql_type));
    ColumnType { sql_type, size }
}

/// Split `numeric(10,2) unsigned` into `("numeric unsigned", [10, 2])`.
fn split_args(lower: &str) -> (String, Vec<u32>) {
    match (lower.find('('), lower.find(')')) {
        (Some(open), Some(close)) if open < close => {
            let args = lower[open + 1..close]
                .split(',')
                .filter_map(|a| a.trim().parse().ok())
                .collect();
            let base = format!("{}{}", lower[..open].trim_end(), &lower[close + 1..]);
            (base, args)
        }
        _ => (lower.to_string(), Vec::new()),
    }
}

fn map_postgres_type(base: &str) -> SqlType {
    match base {
        // Integer types
        "int" | "int4" | "integer" | "serial" | "serial4" => SqlType::Integer,
        "bigint" | "int8" | "bigserial" | "serial8" => SqlType::BigInt,
        "smallint" | "int2" | "smallserial" | "serial2" => SqlType::SmallInt,

        // Floating point
        "real" | "float4" => SqlType::Real,
        "double precision" | "float8" | "float" => SqlType::Double,
        "decimal" => SqlType::Decimal,
        "numeric" | "money" => SqlType::Numeric,

        // String types
        "varchar" | "character varying" => SqlType::VarChar,
        "char" | "character" | "bpchar" => SqlType::Char,
        "text" | "citext" => SqlType::LongVarChar,

        // Date/time
        "timestamp" | "timestamp without time zone" => SqlType::Timestamp,
        "timestamptz" | "timestamp with time zone" => SqlType::TimestampWithTimezone,
        "date" => SqlType::Date,
        "time" | "time without time zone" => SqlType::Time,
        "timetz" | "time with time zone" => SqlType::TimeWithTimezone,

        "boolean" | "bool" => SqlType::Boolean,
        "bit" => SqlType::Bit,
        "bytea" => SqlType::Binary,
        "xml" => SqlType::SqlXml,

        // uuid, json, interval, and extension types have no standard code
        _ => SqlType::Other,
    }
}

fn map_mysql_type(base: &str, args: &[u32]) -> SqlType {
    match base {
        // Integer types
        "int" | "integer" | "mediumint" => SqlType::Integer,
        "bigint" => SqlType::BigInt,
        "smallint" => SqlType::SmallInt,
        // TINYINT(1) is the conventional boolean
        "tinyint" if args == [1] => SqlType::Boolean,
        "tinyint" => SqlType::TinyInt,

        // Floating point
        "float" => SqlType::Real,
        "double" | "double precision" | "real" => SqlType::Double,
        "decimal" | "numeric" => SqlType::Decimal,

        // String types
        "varchar" => SqlType::VarChar,
        "char" | "enum" | "set" => SqlType::Char,
        "text" | "longtext" | "mediumtext" | "tinytext" | "json" => SqlType::LongVarChar,

        // Date/time
        "datetime" | "timestamp" => SqlType::Timestamp,
        "date" | "year" => SqlType::Date,
        "time" => SqlType::Time,

        // Binary
        "blob" | "longblob" | "mediumblob" | "tinyblob" => SqlType::LongVarBinary,
        "binary" => SqlType::Binary,
        "varbinary" => SqlType::VarBinary,

        "bit" => SqlType::Bit,
        "bool" | "boolean" => SqlType::Boolean,

        _ => SqlType::Other,
    }
}

fn map_generic_type(base: &str) -> SqlType {
    match base {
        "int" | "integer" => SqlType::Integer,
        "bigint" => SqlType::BigInt,
        "smallint" => SqlType::SmallInt,
        "tinyint" => SqlType::TinyInt,
        "real" => SqlType::Real,
        "float" => SqlType::Float,
        "double" | "double precision" => SqlType::Double,
        "decimal" => SqlType::Decimal,
        "numeric" | "number" => SqlType::Numeric,
        "varchar" | "character varying" | "varchar2" => SqlType::VarChar,
        "nvarchar" | "nvarchar2" | "national character varying" => SqlType::NVarChar,
        "char" | "character" => SqlType::Char,
        "nchar" | "national character" => SqlType::NChar,
        "text" | "long varchar" => SqlType::LongVarChar,
        "ntext" => SqlType::LongNVarChar,
        "clob" => SqlType::Clob,
        "nclob" => SqlType::NClob,
        "blob" => SqlType::Blob,
        "binary" => SqlType::Binary,
        "varbinary" => SqlType::VarBinary,
        "timestamp" | "datetime" | "datetime2" => SqlType::Timestamp,
        "date" => SqlType::Date,
        "time" => SqlType::Time,
        "boolean" | "bool" => SqlType::Boolean,
        "bit" => SqlType::Bit,
        "xml" => SqlType::SqlXml,
        _ => SqlType::Other,
    }
}

/// Size reported for a type declared without an explicit length or precision.
fn default_size(sql_type: SqlType) -> u32 {
    match sql_type {
        SqlType::BigInt => 19,
        SqlType::Integer => 10,
        SqlType::SmallInt => 5,
        SqlType::TinyInt => 3,
        SqlType::Bit | SqlType::Boolean | SqlType::Char | SqlType::NChar => 1,
        SqlType::Real => 7,
        SqlType::Float | SqlType::Double => 15,
        SqlType::Numeric | SqlType::Decimal => 38,
        SqlType::Date => 10,
        SqlType::Time => 8,
        SqlType::TimeWithTimezone => 14,
        SqlType::Timestamp => 29,
        SqlType::TimestampWithTimezone => 35,
        SqlType::VarChar
        | SqlType::NVarChar
        | SqlType::LongVarChar
        | SqlType::LongNVarChar
        | SqlType::Clob
        | SqlType::NClob
        | SqlType::Binary
        | SqlType::VarBinary
        | SqlType::LongVarBinary
        | SqlType::Blob
        | SqlType::SqlXml => UNBOUNDED,
        _ => 0,
    }
}
