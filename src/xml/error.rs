use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("document contained no root element")]
    NoRoot,
    #[error("unexpected content after the root element")]
    TrailingContent,
    #[error("unexpected closing tag")]
    UnexpectedEnd,
    #[error("reached end of document inside an open element")]
    Eof,
}

pub type Result<T> = std::result::Result<T, XmlError>;
