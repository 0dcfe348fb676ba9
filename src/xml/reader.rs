//! Character-level XML reader building a [`Node`] tree.

use std::iter::Peekable;
use std::str::Chars;

use super::{Element, Node};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XmlError {
    #[error("Unexpected character '{found}' at line {line}, expected {expected}")]
    UnexpectedChar {
        found: char,
        expected: &'static str,
        line: usize,
    },
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEof(&'static str),
    #[error("Mismatched closing tag at line {line}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("Unknown entity reference: &{0};")]
    UnknownEntity(String),
    #[error("Document has no root element")]
    NoRootElement,
    #[error("Unexpected content after the root element at line {0}")]
    TrailingContent(usize),
}

pub struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn expect_char(&mut self, want: char, expected: &'static str) -> Result<(), XmlError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(XmlError::UnexpectedChar {
                found: c,
                expected,
                line: self.line,
            }),
            None => Err(XmlError::UnexpectedEof(expected)),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume characters up to and including `terminator`, returning what came before it.
    fn read_until(&mut self, terminator: &str, expected: &'static str) -> Result<String, XmlError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some(c) => {
                    s.push(c);
                    if s.ends_with(terminator) {
                        s.truncate(s.len() - terminator.len());
                        return Ok(s);
                    }
                }
                None => return Err(XmlError::UnexpectedEof(expected)),
            }
        }
    }

    fn read_name(&mut self) -> Result<String, XmlError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return match self.peek() {
                Some(c) => Err(XmlError::UnexpectedChar {
                    found: c,
                    expected: "name",
                    line: self.line,
                }),
                None => Err(XmlError::UnexpectedEof("name")),
            };
        }
        Ok(name)
    }

    fn read_entity(&mut self) -> Result<char, XmlError> {
        let raw = self.read_until(";", "';' closing an entity reference")?;
        let decoded = match raw.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                if let Some(hex) = raw.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = raw.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
        };
        decoded.ok_or(XmlError::UnknownEntity(raw))
    }

    fn read_attribute_value(&mut self) -> Result<String, XmlError> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            Some(c) => {
                return Err(XmlError::UnexpectedChar {
                    found: c,
                    expected: "quoted attribute value",
                    line: self.line,
                });
            }
            None => return Err(XmlError::UnexpectedEof("attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('&') => value.push(self.read_entity()?),
                Some(c) => value.push(c),
                None => return Err(XmlError::UnexpectedEof("closing quote")),
            }
        }
    }

    /// Skip prolog items: declarations, processing instructions, doctype, comments.
    fn skip_misc(&mut self) -> Result<(), XmlError> {
        loop {
            self.skip_whitespace();
            if self.peek() != Some('<') {
                return Ok(());
            }
            let mut ahead = self.chars.clone();
            ahead.next();
            match ahead.next() {
                Some('?') => {
                    self.read_until("?>", "'?>'")?;
                }
                Some('!') => {
                    self.bump(); // <
                    self.bump(); // !
                    if self.peek() == Some('-') {
                        self.read_until("-->", "'-->'")?;
                    } else {
                        self.skip_doctype()?;
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<(), XmlError> {
        let mut depth = 0usize;
        loop {
            match self.bump() {
                Some('[') => depth += 1,
                Some(']') => depth = depth.saturating_sub(1),
                Some('>') if depth == 0 => return Ok(()),
                Some(_) => {}
                None => return Err(XmlError::UnexpectedEof("'>' closing DOCTYPE")),
            }
        }
    }

    /// Parse a whole document and return its root element.
    pub fn parse_document(mut self) -> Result<Node, XmlError> {
        self.skip_misc()?;
        if self.peek().is_none() {
            return Err(XmlError::NoRootElement);
        }
        self.expect_char('<', "root element")?;
        let root = self.parse_element()?;
        self.skip_misc()?;
        if self.peek().is_some() {
            return Err(XmlError::TrailingContent(self.line));
        }
        Ok(Node::Element(root))
    }

    /// Parse an element whose opening '<' has been consumed.
    fn parse_element(&mut self) -> Result<Element, XmlError> {
        let name = self.read_name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect_char('>', "'>' after '/'")?;
                    return Ok(Element {
                        name,
                        attributes,
                        children: Vec::new(),
                    });
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let key = self.read_name()?;
                    self.skip_whitespace();
                    self.expect_char('=', "'=' after attribute name")?;
                    self.skip_whitespace();
                    let value = self.read_attribute_value()?;
                    attributes.push((key, value));
                }
                None => return Err(XmlError::UnexpectedEof("'>' closing a start tag")),
            }
        }

        let children = self.parse_content(&name)?;
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_content(&mut self, parent: &str) -> Result<Vec<Node>, XmlError> {
        let mut children = Vec::new();
        let mut text = String::new();

        loop {
            match self.bump() {
                Some('<') => {
                    if !text.is_empty() {
                        children.push(Node::Text(std::mem::take(&mut text)));
                    }
                    match self.peek() {
                        Some('/') => {
                            self.bump();
                            let found = self.read_name()?;
                            self.skip_whitespace();
                            self.expect_char('>', "'>' closing an end tag")?;
                            if found != parent {
                                return Err(XmlError::MismatchedTag {
                                    expected: parent.to_string(),
                                    found,
                                    line: self.line,
                                });
                            }
                            return Ok(children);
                        }
                        Some('!') => {
                            self.bump();
                            if self.peek() == Some('[') {
                                self.expect_cdata_open()?;
                                let data = self.read_until("]]>", "']]>'")?;
                                children.push(Node::Text(data));
                            } else {
                                self.expect_char('-', "comment")?;
                                self.expect_char('-', "comment")?;
                                let comment = self.read_until("-->", "'-->'")?;
                                children.push(Node::Comment(comment));
                            }
                        }
                        Some('?') => {
                            self.read_until("?>", "'?>'")?;
                        }
                        _ => children.push(Node::Element(self.parse_element()?)),
                    }
                }
                Some('&') => text.push(self.read_entity()?),
                Some(c) => text.push(c),
                None => return Err(XmlError::UnexpectedEof("closing tag")),
            }
        }
    }

    fn expect_cdata_open(&mut self) -> Result<(), XmlError> {
        for c in "[CDATA[".chars() {
            self.expect_char(c, "CDATA section")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(input: &str) -> Element {
        match Reader::new(input).parse_document().unwrap() {
            Node::Element(e) => e,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_elements() {
        let e = root(r#"<a x="1"><b/><c y='2'>hi</c></a>"#);
        assert_eq!(e.name, "a");
        assert_eq!(e.attributes, vec![("x".to_string(), "1".to_string())]);
        assert_eq!(e.children.len(), 2);
    }

    #[test]
    fn test_prolog_doctype_and_comments() {
        let input = r#"<?xml version="1.0"?>
<!DOCTYPE gsa-template SYSTEM "gsa.dtd" [ <!ENTITY x "y"> ]>
<!-- leading -->
<gsa-template><!-- inner --></gsa-template>
<!-- trailing -->"#;
        let e = root(input);
        assert_eq!(e.name, "gsa-template");
        assert!(matches!(e.children[0], Node::Comment(_)));
    }

    #[test]
    fn test_entities_and_cdata() {
        let e = root(r#"<a v="&lt;&amp;&#65;&#x42;">x &gt; y<![CDATA[<raw>]]></a>"#);
        assert_eq!(e.attributes[0].1, "<&AB");
        assert_eq!(e.children[0], Node::Text("x > y".into()));
        assert_eq!(e.children[1], Node::Text("<raw>".into()));
    }

    #[test]
    fn test_mismatched_tag() {
        let err = Reader::new("<a><b></a></b>").parse_document().unwrap_err();
        assert!(matches!(err, XmlError::MismatchedTag { .. }));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Reader::new("  <!-- only -->").parse_document().unwrap_err(),
            XmlError::NoRootElement
        );
        assert!(matches!(
            Reader::new("<a></a><b/>").parse_document().unwrap_err(),
            XmlError::TrailingContent(_)
        ));
        assert_eq!(
            Reader::new("<a>&bogus;</a>").parse_document().unwrap_err(),
            XmlError::UnknownEntity("bogus".into())
        );
    }
}
