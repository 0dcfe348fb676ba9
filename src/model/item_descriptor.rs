use std::collections::BTreeMap;

use super::selection::{by_name, dedup_named, select};
use super::{DescriptorNode, MetaModelError, ParseOptions, Property, Table, flag, required_attr};

/// A named mapping of one logical entity onto tables and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDescriptor {
    name: String,
    default: bool,
    tables: BTreeMap<String, Table>,
    primary_table: Option<String>,
    properties: BTreeMap<String, Property>,
}

impl ItemDescriptor {
    pub fn from_node<N: DescriptorNode>(node: &N) -> Result<Self, MetaModelError> {
        Self::from_node_with(node, &ParseOptions::default())
    }

    pub fn from_node_with<N: DescriptorNode>(
        node: &N,
        options: &ParseOptions,
    ) -> Result<Self, MetaModelError> {
        let name = required_attr(node, "item-descriptor", "name")?;
        let default = flag(node, "default");

        let parsed_tables: Vec<Table> = node
            .children_named("table")
            .into_iter()
            .map(Table::from_node)
            .collect();
        let parsed_tables = dedup_named(parsed_tables, "table", Table::name, options.duplicates)?;

        // Selection runs over the surviving definitions only.
        let primary_table = select(parsed_tables.iter().map(|t| (t.name(), t.is_primary())))
            .map(str::to_string);
        let tables = by_name(parsed_tables, Table::name);

        let parsed_properties = node
            .descendants_named("property")
            .into_iter()
            .map(Property::from_node)
            .collect::<Result<Vec<_>, _>>()?;
        let properties = by_name(
            dedup_named(parsed_properties, "property", Property::name, options.duplicates)?,
            Property::name,
        );

        tracing::debug!(
            "Item descriptor '{}': {} table(s), {} propert(ies), primary={:?}",
            name,
            tables.len(),
            properties.len(),
            primary_table
        );

        Ok(Self {
            name,
            default,
            tables,
            primary_table,
            properties,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the document explicitly marks this descriptor as default.
    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// The explicitly primary table, or the first one in document order.
    pub fn primary_table(&self) -> Option<&Table> {
        self.primary_table.as_deref().and_then(|n| self.tables.get(n))
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}
