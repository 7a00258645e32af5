use thiserror::Error;

/// Errors raised while parsing or serializing a part's XML content.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid utf-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unbound namespace prefix `{0}`")]
    UnboundPrefix(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("malformed document: {0}")]
    Malformed(&'static str),
}
