use super::NodeKind;
use crate::xml::XmlError;

#[derive(Debug, thiserror::Error)]
pub enum MetaModelError {
    #[error("{entity} is missing required attribute '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("Descriptor root must be an element node, found a {found} node")]
    WrongNodeKind { found: NodeKind },
    #[error("Duplicate {entity} name '{name}'")]
    DuplicateName { entity: &'static str, name: String },
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}
