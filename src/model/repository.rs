use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::selection::{by_name, dedup_named, select};
use super::{DescriptorNode, Header, ItemDescriptor, MetaModelError, NodeKind, ParseOptions};
use crate::xml;

/// Root entity of one repository descriptor document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlRepository {
    header: Option<Header>,
    item_descriptors: BTreeMap<String, ItemDescriptor>,
    default_item_descriptor: Option<String>,
}

impl SqlRepository {
    pub fn from_node<N: DescriptorNode>(root: &N) -> Result<Self, MetaModelError> {
        Self::from_node_with(root, &ParseOptions::default())
    }

    /// Build the repository from a document root.
    ///
    /// Fails on the first invalid entity; no partial repository is returned.
    pub fn from_node_with<N: DescriptorNode>(
        root: &N,
        options: &ParseOptions,
    ) -> Result<Self, MetaModelError> {
        if root.kind() != NodeKind::Element {
            return Err(MetaModelError::WrongNodeKind { found: root.kind() });
        }

        let header = root
            .descendants_named("header")
            .first()
            .map(|n| Header::from_node(*n));

        // First pass: build every descriptor in document order.
        let parsed = root
            .descendants_named("item-descriptor")
            .into_iter()
            .map(|n| ItemDescriptor::from_node_with(n, options))
            .collect::<Result<Vec<_>, _>>()?;

        let parsed =
            dedup_named(parsed, "item-descriptor", ItemDescriptor::name, options.duplicates)?;

        // Second pass: explicit flag wins, else first seen.
        let default_item_descriptor =
            select(parsed.iter().map(|d| (d.name(), d.is_default()))).map(str::to_string);
        let item_descriptors = by_name(parsed, ItemDescriptor::name);

        tracing::debug!(
            "Parsed repository with {} item descriptor(s), default={:?}",
            item_descriptors.len(),
            default_item_descriptor
        );

        Ok(Self {
            header,
            item_descriptors,
            default_item_descriptor,
        })
    }

    /// Parse a repository from XML text.
    pub fn from_xml(input: &str) -> Result<Self, MetaModelError> {
        Self::from_xml_with(input, &ParseOptions::default())
    }

    pub fn from_xml_with(input: &str, options: &ParseOptions) -> Result<Self, MetaModelError> {
        let root = xml::parse(input)?;
        Self::from_node_with(&root, options)
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn item_descriptors(&self) -> impl Iterator<Item = &ItemDescriptor> {
        self.item_descriptors.values()
    }

    pub fn item_descriptor(&self, name: &str) -> Option<&ItemDescriptor> {
        self.item_descriptors.get(name)
    }

    /// The explicitly default descriptor, or the first one in document order.
    pub fn default_item_descriptor(&self) -> Option<&ItemDescriptor> {
        self.default_item_descriptor
            .as_deref()
            .and_then(|n| self.item_descriptors.get(n))
    }

    /// Human-readable outline of the repository.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        if let Some(header) = &self.header {
            let _ = writeln!(out, "repository {}", header.name().unwrap_or("(unnamed)"));
            if let Some(author) = header.author() {
                let _ = writeln!(out, "  author: {}", author);
            }
            if let Some(version) = header.version() {
                let _ = writeln!(out, "  version: {}", version);
            }
            if let Some(description) = header.description() {
                let _ = writeln!(out, "  description: {}", description);
            }
        } else {
            out.push_str("repository (no header)\n");
        }

        let default_name = self.default_item_descriptor.as_deref();
        for item in self.item_descriptors() {
            let marker = if Some(item.name()) == default_name { " (default)" } else { "" };
            let _ = writeln!(out, "item-descriptor {}{}", item.name(), marker);

            if let Some(primary) = item.primary_table() {
                let _ = writeln!(
                    out,
                    "  primary table {} [{}]",
                    primary.name(),
                    primary.id_column_names().join(",")
                );
            }
            for property in item.properties() {
                let _ = writeln!(
                    out,
                    "  property {} -> {} : {}{}",
                    property.name(),
                    property.column_name().unwrap_or("-"),
                    property.data_type().unwrap_or("-"),
                    if property.is_required() { " required" } else { "" }
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DuplicatePolicy;
    use crate::xml::Node;

    const THREE: &str = r#"
        <gsa-template>
            <header><name>Shop</name></header>
            <item-descriptor name="a"/>
            <item-descriptor name="b"/>
            <item-descriptor name="c"/>
        </gsa-template>"#;

    #[test]
    fn test_default_is_first_without_flags() {
        let repo = SqlRepository::from_xml(THREE).unwrap();
        assert_eq!(repo.item_descriptors().count(), 3);
        assert_eq!(repo.default_item_descriptor().unwrap().name(), "a");
        assert_eq!(repo.header().unwrap().name(), Some("Shop"));
    }

    #[test]
    fn test_flagged_default_wins() {
        let input = THREE.replace(r#"name="c""#, r#"name="c" default="true""#);
        let repo = SqlRepository::from_xml(&input).unwrap();
        assert_eq!(repo.default_item_descriptor().unwrap().name(), "c");
    }

    #[test]
    fn test_default_chosen_after_replacement() {
        let repo = SqlRepository::from_xml(
            r#"<r>
                <item-descriptor name="a" default="true"/>
                <item-descriptor name="b" default="true"/>
                <item-descriptor name="b"/>
            </r>"#,
        )
        .unwrap();
        let default = repo.default_item_descriptor().unwrap();
        assert_eq!(default.name(), "a");
        assert!(default.is_default());
    }

    #[test]
    fn test_descriptors_found_at_any_depth() {
        let repo = SqlRepository::from_xml(
            r#"<root><group><item-descriptor name="deep"/></group></root>"#,
        )
        .unwrap();
        assert!(repo.header().is_none());
        assert!(repo.item_descriptor("deep").is_some());
    }

    #[test]
    fn test_wrong_root_kind() {
        let err = SqlRepository::from_node(&Node::Text("loose".into())).unwrap_err();
        assert!(matches!(
            err,
            MetaModelError::WrongNodeKind {
                found: NodeKind::Text
            }
        ));
    }

    #[test]
    fn test_fail_fast_on_nested_error() {
        let err = SqlRepository::from_xml(
            r#"<r><item-descriptor name="ok"/><item-descriptor><property name="p"/></item-descriptor></r>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MetaModelError::MissingField { entity: "item-descriptor", .. }));
    }

    #[test]
    fn test_duplicate_descriptor_policy() {
        let input = r#"<r>
            <item-descriptor name="a"><property name="first"/></item-descriptor>
            <item-descriptor name="a"><property name="second"/></item-descriptor>
        </r>"#;

        let repo = SqlRepository::from_xml(input).unwrap();
        assert!(repo.item_descriptor("a").unwrap().property("second").is_some());

        let strict = ParseOptions {
            duplicates: DuplicatePolicy::Reject,
        };
        assert!(matches!(
            SqlRepository::from_xml_with(input, &strict),
            Err(MetaModelError::DuplicateName { entity: "item-descriptor", .. })
        ));
    }

    #[test]
    fn test_summary() {
        let repo = SqlRepository::from_xml(
            r#"<gsa-template>
                <header><name>R</name><author>me</author></header>
                <item-descriptor name="user">
                    <table name="USERS" type="primary" id-column-names="ID">
                        <property name="id" column-names="ID" data-types="int" required="true"/>
                    </table>
                </item-descriptor>
            </gsa-template>"#,
        )
        .unwrap();
        assert_eq!(
            repo.summary(),
            "repository R\n  author: me\nitem-descriptor user (default)\n  primary table USERS [ID]\n  property id -> ID : int required\n"
        );
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            SqlRepository::from_xml("<r><item-descriptor name='a'></r>"),
            Err(MetaModelError::Xml(_))
        ));
    }
}
