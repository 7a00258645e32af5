//! `[Content_Types].xml` lookup: extension defaults plus per-part overrides.

use aasfix_types::uris::OPC_CONTENT_TYPES_NS;
use aasfix_xml::Document;
use anyhow::Context;

#[derive(Debug, Clone, Default)]
pub(crate) struct ContentTypes {
    /// Lower-cased extension -> content type.
    defaults: Vec<(String, String)>,
    /// Part name (leading slash) -> content type.
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub(crate) fn parse(bytes: &[u8]) -> anyhow::Result<Self> {
        let doc = Document::from_bytes(bytes).context("parse [Content_Types].xml")?;
        let mut types = Self::default();
        for el in doc.root.child_elements() {
            if el.is(OPC_CONTENT_TYPES_NS, "Default") {
                if let (Some(ext), Some(ct)) = (el.attr("Extension"), el.attr("ContentType")) {
                    types.defaults.push((ext.to_ascii_lowercase(), ct.to_owned()));
                }
            } else if el.is(OPC_CONTENT_TYPES_NS, "Override")
                && let (Some(part), Some(ct)) = (el.attr("PartName"), el.attr("ContentType"))
            {
                types.overrides.push((part.to_owned(), ct.to_owned()));
            }
        }
        Ok(types)
    }

    /// Override wins over the extension default.
    pub(crate) fn content_type_for(&self, part_name: &str) -> Option<&str> {
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part_name) {
            return Some(ct);
        }
        let ext = part_name.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }
}
