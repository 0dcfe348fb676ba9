use super::DescriptorNode;

/// Descriptive header of a repository document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    name: Option<String>,
    author: Option<String>,
    version: Option<String>,
    description: Option<String>,
}

impl Header {
    pub fn from_node<N: DescriptorNode>(node: &N) -> Self {
        let child_text = |tag: &str| {
            node.children_named(tag)
                .first()
                .map(|n| n.text().trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            name: child_text("name"),
            author: child_text("author"),
            version: child_text("version"),
            description: child_text("description"),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    #[test]
    fn test_header_fields() {
        let node = xml::parse(
            r#"<header>
                <name>OrderRepository</name>
                <author>jdoe</author>
                <description>
                    Orders and their lines
                </description>
            </header>"#,
        )
        .unwrap();

        let header = Header::from_node(&node);
        assert_eq!(header.name(), Some("OrderRepository"));
        assert_eq!(header.author(), Some("jdoe"));
        assert_eq!(header.version(), None);
        assert_eq!(header.description(), Some("Orders and their lines"));
    }
}
