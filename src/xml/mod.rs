//! Minimal XML document tree used as the descriptor document source.

mod reader;

pub use reader::XmlError;

use crate::model::{DescriptorNode, NodeKind};
use reader::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Parse an XML document, returning its root element node.
pub fn parse(input: &str) -> Result<Node, XmlError> {
    Reader::new(input).parse_document()
}

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl Element {
    fn collect_descendants<'a>(&'a self, tag: &str, out: &mut Vec<&'a Node>) {
        for child in &self.children {
            if let Node::Element(e) = child {
                if e.name == tag {
                    out.push(child);
                }
                e.collect_descendants(tag, out);
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }
}

impl DescriptorNode for Node {
    fn kind(&self) -> NodeKind {
        match self {
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
        }
    }

    fn tag(&self) -> &str {
        match self {
            Node::Element(e) => &e.name,
            _ => "",
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element(e) => e
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    fn children_named(&self, tag: &str) -> Vec<&Self> {
        match self {
            Node::Element(e) => e
                .children
                .iter()
                .filter(|c| matches!(c, Node::Element(child) if child.name == tag))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn descendants_named(&self, tag: &str) -> Vec<&Self> {
        let mut out = Vec::new();
        if let Node::Element(e) = self {
            e.collect_descendants(tag, &mut out);
        }
        out
    }

    fn text(&self) -> String {
        match self {
            Node::Element(e) => {
                let mut out = String::new();
                e.collect_text(&mut out);
                out
            }
            Node::Text(t) => t.clone(),
            Node::Comment(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let doc = parse(
            r#"<root a="1">
                <item n="x"><item n="y"/></item>
                <other><item n="z"/></other>
            </root>"#,
        )
        .unwrap();

        assert_eq!(doc.kind(), NodeKind::Element);
        assert_eq!(doc.tag(), "root");
        assert_eq!(doc.attribute("a"), Some("1"));
        assert_eq!(doc.attribute("b"), None);

        let direct: Vec<_> = doc
            .children_named("item")
            .iter()
            .filter_map(|n| n.attribute("n"))
            .collect();
        assert_eq!(direct, vec!["x"]);

        let all: Vec<_> = doc
            .descendants_named("item")
            .iter()
            .filter_map(|n| n.attribute("n"))
            .collect();
        assert_eq!(all, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_text_and_escape() {
        let doc = parse("<d>  a &amp; <b>b</b> </d>").unwrap();
        assert_eq!(doc.text(), "  a & b ");
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&apos;");
    }
}
