//! Parsing and serialization of the package-level `/_rels/.rels` document.

use crate::{Relationship, TargetMode};
use aasfix_types::uris::OPC_RELATIONSHIPS_NS;
use aasfix_xml::{Decl, Document, Element, Node};
use anyhow::Context;

pub(crate) fn parse(bytes: &[u8]) -> anyhow::Result<Vec<Relationship>> {
    let doc = Document::from_bytes(bytes).context("parse relationship definitions")?;
    let mut rels = Vec::new();
    for el in doc.root.children_named(OPC_RELATIONSHIPS_NS, "Relationship") {
        let id = el
            .attr("Id")
            .context("relationship without Id attribute")?
            .to_owned();
        let target = el
            .attr("Target")
            .context("relationship without Target attribute")?
            .to_owned();
        let rel_type = el
            .attr("Type")
            .context("relationship without Type attribute")?
            .to_owned();
        let target_mode = match el.attr("TargetMode") {
            Some("External") => TargetMode::External,
            _ => TargetMode::Internal,
        };
        rels.push(Relationship {
            id,
            target,
            target_mode,
            rel_type,
        });
    }
    Ok(rels)
}

pub(crate) fn serialize(rels: &[Relationship]) -> anyhow::Result<Vec<u8>> {
    let mut root = Element::new(Some(OPC_RELATIONSHIPS_NS), "Relationships");
    for rel in rels {
        let mut el = Element::new(Some(OPC_RELATIONSHIPS_NS), "Relationship");
        el.set_attr("Type", &rel.rel_type);
        el.set_attr("Target", &rel.target);
        el.set_attr("Id", &rel.id);
        if rel.target_mode == TargetMode::External {
            el.set_attr("TargetMode", "External");
        }
        root.children.push(Node::Element(el));
    }
    let doc = Document {
        decl: Some(Decl {
            version: "1.0".to_owned(),
            encoding: Some("UTF-8".to_owned()),
            standalone: None,
        }),
        prolog: Vec::new(),
        root,
        epilog: Vec::new(),
    };
    doc.to_bytes().context("serialize relationship definitions")
}
