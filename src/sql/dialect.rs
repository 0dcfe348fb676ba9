//! Dump dialects and their detection.

use serde::{Deserialize, Serialize};

const POSTGRES_BANNERS: &[&str] = &["postgresql database dump", "pg_dump", "-- postgres"];
const MYSQL_BANNERS: &[&str] = &["mysql dump", "mysqldump", "-- mysql"];
const POSTGRES_MARKERS: &[&str] = &["serial", "[]", "::", "timestamptz", "bytea"];
const MYSQL_MARKERS: &[&str] = &["auto_increment", "tinyint", "engine=", "unsigned"];

/// Dialect of a SQL dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Auto-detect from dump content
    #[default]
    Auto,
    /// Standard SQL
    Generic,
    /// PostgreSQL
    #[serde(alias = "postgres")]
    PostgreSQL,
    /// MySQL
    MySQL,
}

impl Dialect {
    /// Parse dialect from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "generic" => Some(Self::Generic),
            "postgres" | "postgresql" => Some(Self::PostgreSQL),
            "mysql" => Some(Self::MySQL),
            _ => None,
        }
    }

    /// Guess the dialect of a dump: dump banners first, then type and option keywords.
    pub fn detect(content: &str) -> Self {
        let lower = content.to_lowercase();
        let any = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

        if any(POSTGRES_BANNERS) {
            Self::PostgreSQL
        } else if any(MYSQL_BANNERS) {
            Self::MySQL
        } else if any(POSTGRES_MARKERS) {
            Self::PostgreSQL
        } else if any(MYSQL_MARKERS) {
            Self::MySQL
        } else {
            Self::Generic
        }
    }

    /// Resolve Auto to a concrete dialect.
    pub fn resolve(self, content: &str) -> Self {
        match self {
            Self::Auto => Self::detect(content),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_postgres() {
        let sql = "-- PostgreSQL database dump\nCREATE TABLE users (id SERIAL);";
        assert_eq!(Dialect::detect(sql), Dialect::PostgreSQL);
        assert_eq!(Dialect::detect("CREATE TABLE t (b BYTEA);"), Dialect::PostgreSQL);
    }

    #[test]
    fn test_detect_mysql() {
        let sql = "-- MySQL dump\nCREATE TABLE users (id INT AUTO_INCREMENT);";
        assert_eq!(Dialect::detect(sql), Dialect::MySQL);
    }

    #[test]
    fn test_detect_generic() {
        let sql = "CREATE TABLE users (id INTEGER PRIMARY KEY);";
        assert_eq!(Dialect::detect(sql), Dialect::Generic);
        assert_eq!(Dialect::Generic.resolve("id SERIAL"), Dialect::Generic);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Dialect::from_str("Postgres"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::from_str("oracle"), None);
    }
}
