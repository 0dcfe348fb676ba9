use super::{DescriptorNode, MetaModelError, flag, optional_attr, required_attr, split_list};

/// One mapped attribute of an item descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    column_name: Option<String>,
    data_type: Option<String>,
    item_type: Option<String>,
    repository: Option<String>,
    required: bool,
}

impl Property {
    pub fn from_node<N: DescriptorNode>(node: &N) -> Result<Self, MetaModelError> {
        let name = required_attr(node, "property", "name")?;
        let column_name =
            optional_attr(node, "column-name").or_else(|| optional_attr(node, "column-names"));
        let data_type =
            optional_attr(node, "data-type").or_else(|| optional_attr(node, "data-types"));

        Ok(Self {
            name,
            column_name,
            data_type,
            item_type: optional_attr(node, "item-type"),
            repository: optional_attr(node, "repository"),
            required: flag(node, "required"),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw column attribute, possibly a comma-joined list.
    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.column_name.as_deref().map(|c| split_list(c).collect()).unwrap_or_default()
    }

    /// Raw data type attribute, possibly a comma-joined list.
    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    pub fn data_types(&self) -> Vec<&str> {
        self.data_type.as_deref().map(|d| split_list(d).collect()).unwrap_or_default()
    }

    pub fn item_type(&self) -> Option<&str> {
        self.item_type.as_deref()
    }

    /// Name of an external repository the item type lives in.
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}
