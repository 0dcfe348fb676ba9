//! Identifier derivation from physical table and column names.

use convert_case::{Case, Casing};

/// Derives object identifiers from physical names.
pub trait Naming {
    /// Object name for a table, e.g. `ORDER_ITEMS` -> `OrderItem`.
    fn object_name(&self, table_name: &str) -> String;

    /// Property name for a column, e.g. `ORDER_DATE` -> `orderDate`.
    fn column_object_name(&self, column_name: &str) -> String;
}

/// Lower-cases, singularizes the last word of table names, and applies
/// Pascal / lower camel case.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

impl Naming for DefaultNaming {
    fn object_name(&self, table_name: &str) -> String {
        let lower = table_name.to_lowercase();
        let singular = match lower.rsplit_once('_') {
            Some((head, last)) => format!("{}_{}", head, singularize(last)),
            None => singularize(&lower),
        };
        singular.to_case(Case::Pascal)
    }

    fn column_object_name(&self, column_name: &str) -> String {
        column_name.to_lowercase().to_case(Case::Camel)
    }
}

/// English singular of a lower-case word, for the common plural endings.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 1
        && word.ends_with('s')
        && !["ss", "us", "is"].iter().any(|keep| word.ends_with(keep))
    {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_names() {
        let n = DefaultNaming;
        assert_eq!(n.object_name("ORDERS"), "Order");
        assert_eq!(n.object_name("ORDER_ITEMS"), "OrderItem");
        assert_eq!(n.object_name("categories"), "Category");
        assert_eq!(n.object_name("ADDRESSES"), "Address");
        assert_eq!(n.object_name("STATUS"), "Status");
        assert_eq!(n.object_name("LEGACY"), "Legacy");
    }

    #[test]
    fn test_column_names() {
        let n = DefaultNaming;
        assert_eq!(n.column_object_name("ORDER_DATE"), "orderDate");
        assert_eq!(n.column_object_name("ID"), "id");
        assert_eq!(n.column_object_name("name"), "name");
    }
}
