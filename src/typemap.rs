//! Relational type code to descriptor type mapping.

use std::fmt;

/// Standard relational column type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    Date,
    Time,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Null,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Blob,
    Clob,
    Ref,
    DataLink,
    Boolean,
    RowId,
    NChar,
    NVarChar,
    LongNVarChar,
    NClob,
    SqlXml,
    TimeWithTimezone,
    TimestampWithTimezone,
}

impl SqlType {
    pub const ALL: [SqlType; 38] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Float,
        SqlType::Real,
        SqlType::Double,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Char,
        SqlType::VarChar,
        SqlType::LongVarChar,
        SqlType::Date,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::LongVarBinary,
        SqlType::Null,
        SqlType::Other,
        SqlType::JavaObject,
        SqlType::Distinct,
        SqlType::Struct,
        SqlType::Array,
        SqlType::Blob,
        SqlType::Clob,
        SqlType::Ref,
        SqlType::DataLink,
        SqlType::Boolean,
        SqlType::RowId,
        SqlType::NChar,
        SqlType::NVarChar,
        SqlType::LongNVarChar,
        SqlType::NClob,
        SqlType::SqlXml,
        SqlType::TimeWithTimezone,
        SqlType::TimestampWithTimezone,
    ];

    /// Numeric type code as reported by schema introspection.
    pub fn code(self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::VarChar => 12,
            SqlType::LongVarChar => -1,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::Null => 0,
            SqlType::Other => 1111,
            SqlType::JavaObject => 2000,
            SqlType::Distinct => 2001,
            SqlType::Struct => 2002,
            SqlType::Array => 2003,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Ref => 2006,
            SqlType::DataLink => 70,
            SqlType::Boolean => 16,
            SqlType::RowId => -8,
            SqlType::NChar => -15,
            SqlType::NVarChar => -9,
            SqlType::LongNVarChar => -16,
            SqlType::NClob => 2011,
            SqlType::SqlXml => 2009,
            SqlType::TimeWithTimezone => 2013,
            SqlType::TimestampWithTimezone => 2014,
        }
    }

    /// Look up a type by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Descriptor type name for this column type.
    ///
    /// `None` means the type has no descriptor representation. It is not an
    /// error; callers decide how to render the gap.
    pub fn descriptor_type(self) -> Option<&'static str> {
        match self {
            // Integral
            SqlType::BigInt => Some("long"),
            SqlType::Integer => Some("int"),
            SqlType::SmallInt | SqlType::TinyInt => Some("short"),

            // Character
            SqlType::Char | SqlType::VarChar | SqlType::NChar | SqlType::NVarChar => {
                Some("string")
            }
            SqlType::LongVarChar | SqlType::LongNVarChar | SqlType::Clob | SqlType::NClob => {
                Some("big string")
            }

            // Binary
            SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary | SqlType::Blob => {
                Some("binary")
            }

            // Temporal
            SqlType::Date => Some("date"),
            SqlType::Time
            | SqlType::Timestamp
            | SqlType::TimeWithTimezone
            | SqlType::TimestampWithTimezone => Some("timestamp"),

            // Floating / decimal
            SqlType::Double | SqlType::Float | SqlType::Numeric | SqlType::Decimal => {
                Some("double")
            }
            SqlType::Real => Some("float"),

            SqlType::Bit | SqlType::Boolean => Some("boolean"),

            // No representation
            SqlType::Null
            | SqlType::Other
            | SqlType::JavaObject
            | SqlType::Distinct
            | SqlType::Struct
            | SqlType::Array
            | SqlType::Ref
            | SqlType::DataLink
            | SqlType::RowId
            | SqlType::SqlXml => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

/// Map a raw type code to a descriptor type name.
///
/// Codes outside the standard table (driver-specific extensions) map to `None`.
pub fn map_type_code(code: i32) -> Option<&'static str> {
    SqlType::from_code(code).and_then(SqlType::descriptor_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_types() {
        assert_eq!(map_type_code(-5), Some("long"));
        assert_eq!(map_type_code(4), Some("int"));
        assert_eq!(map_type_code(5), Some("short"));
        assert_eq!(map_type_code(-6), Some("short"));
    }

    #[test]
    fn test_character_and_binary_types() {
        assert_eq!(SqlType::VarChar.descriptor_type(), Some("string"));
        assert_eq!(SqlType::Clob.descriptor_type(), Some("big string"));
        assert_eq!(SqlType::LongVarChar.descriptor_type(), Some("big string"));
        assert_eq!(SqlType::Blob.descriptor_type(), Some("binary"));
    }

    #[test]
    fn test_temporal_and_numeric_types() {
        assert_eq!(SqlType::Date.descriptor_type(), Some("date"));
        assert_eq!(SqlType::Timestamp.descriptor_type(), Some("timestamp"));
        assert_eq!(SqlType::Decimal.descriptor_type(), Some("double"));
        assert_eq!(SqlType::Real.descriptor_type(), Some("float"));
        assert_eq!(SqlType::Boolean.descriptor_type(), Some("boolean"));
    }

    #[test]
    fn test_absent_types() {
        for t in [
            SqlType::Array,
            SqlType::JavaObject,
            SqlType::Ref,
            SqlType::Struct,
            SqlType::Null,
            SqlType::Other,
        ] {
            assert_eq!(t.descriptor_type(), None, "{t}");
        }
        // Driver-specific code
        assert_eq!(map_type_code(-155), None);
    }

    #[test]
    fn test_every_code_is_handled() {
        for t in SqlType::ALL {
            assert_eq!(SqlType::from_code(t.code()), Some(t));
            assert_eq!(map_type_code(t.code()), t.descriptor_type());
        }
    }
}
