use super::{DescriptorNode, optional_attr, split_list};

/// A physical table within an item descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    schema: Option<String>,
    primary: bool,
    id_column_names: Vec<String>,
}

impl Table {
    /// Build a table from its node. A table without a name is kept under the
    /// empty name, since nothing downstream requires one.
    pub fn from_node<N: DescriptorNode>(node: &N) -> Self {
        let name = optional_attr(node, "name").unwrap_or_default();
        let schema = optional_attr(node, "schema")
            .or_else(|| name.rsplit_once('.').map(|(schema, _)| schema.to_string()));
        let primary = node
            .attribute("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("primary"));
        let id_column_names = optional_attr(node, "id-column-names")
            .or_else(|| optional_attr(node, "id-column-name"))
            .map(|ids| split_list(&ids).map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            name,
            schema,
            primary,
            id_column_names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Whether the document explicitly marks this table as primary.
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn id_column_names(&self) -> &[String] {
        &self.id_column_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    #[test]
    fn test_qualified_name() {
        let node =
            xml::parse(r#"<table name="APP.ORDERS" type="primary" id-column-names="ID,SUB_ID"/>"#)
                .unwrap();
        let t = Table::from_node(&node);
        assert_eq!(t.name(), "APP.ORDERS");
        assert_eq!(t.schema(), Some("APP"));
        assert!(t.is_primary());
        assert_eq!(t.id_column_names(), ["ID", "SUB_ID"]);
    }

    #[test]
    fn test_explicit_schema_and_auxiliary() {
        let node = xml::parse(r#"<table name="ORDER_NOTES" schema="app" type="auxiliary"/>"#)
            .unwrap();
        let t = Table::from_node(&node);
        assert_eq!(t.schema(), Some("app"));
        assert!(!t.is_primary());
        assert!(t.id_column_names().is_empty());
    }
}
