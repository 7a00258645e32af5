//! Serialization of the element tree back to bytes.
//!
//! Prefixes are re-synthesized: the root element's namespace becomes the
//! default declaration and every other namespace in the document gets a
//! generated `nN` prefix, all declared on the root. Attribute namespaces
//! always use a prefix since the default declaration does not apply to
//! attributes.

use crate::{Decl, Document, Element, Node, XmlError};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

struct NsContext {
    default_ns: Option<String>,
    /// `(namespace, prefix)` in first-seen document order.
    prefixed: Vec<(String, String)>,
}

impl NsContext {
    fn for_document(doc: &Document) -> Self {
        let default_ns = doc.root.ns.clone();
        let mut element_ns = Vec::new();
        let mut attr_ns = Vec::new();
        collect(&doc.root, &mut element_ns, &mut attr_ns);

        let mut prefixed: Vec<(String, String)> = Vec::new();
        let mut counter = 0usize;
        for ns in element_ns {
            if default_ns.as_deref() == Some(ns.as_str()) || ns == XML_NS {
                continue;
            }
            counter += 1;
            prefixed.push((ns, format!("n{counter}")));
        }
        // Attribute namespaces need a prefix even when they equal the default.
        for ns in attr_ns {
            if ns == XML_NS || prefixed.iter().any(|(n, _)| n == &ns) {
                continue;
            }
            counter += 1;
            prefixed.push((ns, format!("n{counter}")));
        }
        Self {
            default_ns,
            prefixed,
        }
    }

    fn prefix_for(&self, ns: &str) -> Option<&str> {
        // The xml prefix is implicitly bound and must not be redeclared.
        if ns == XML_NS {
            return Some("xml");
        }
        self.prefixed
            .iter()
            .find(|(n, _)| n == ns)
            .map(|(_, p)| p.as_str())
    }

    /// Whether `ns` serializes without a prefix.
    fn is_default(&self, ns: &str) -> bool {
        self.default_ns.as_deref() == Some(ns) && self.prefix_for(ns).is_none()
    }
}

fn collect(el: &Element, element_ns: &mut Vec<String>, attr_ns: &mut Vec<String>) {
    if let Some(ns) = &el.ns
        && !element_ns.contains(ns)
    {
        element_ns.push(ns.clone());
    }
    for attr in &el.attrs {
        if let Some(ns) = &attr.ns
            && !attr_ns.contains(ns)
        {
            attr_ns.push(ns.clone());
        }
    }
    for node in &el.children {
        if let Node::Element(child) = node {
            collect(child, element_ns, attr_ns);
        }
    }
}

pub(crate) fn serialize(doc: &Document) -> Result<Vec<u8>, XmlError> {
    let ctx = NsContext::for_document(doc);
    let mut writer = Writer::new(Vec::new());

    if let Some(decl) = &doc.decl {
        writer.write_event(Event::Decl(decl_event(decl)))?;
    }
    for node in &doc.prolog {
        write_misc(&mut writer, node)?;
    }
    write_element(&mut writer, &doc.root, &ctx, None, true)?;
    for node in &doc.epilog {
        write_misc(&mut writer, node)?;
    }

    Ok(writer.into_inner())
}

fn decl_event(decl: &Decl) -> BytesDecl<'_> {
    BytesDecl::new(
        &decl.version,
        decl.encoding.as_deref(),
        decl.standalone.as_deref(),
    )
}

fn write_misc(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(_) => Err(XmlError::Malformed("element outside the root")),
        Node::Text(t) => {
            writer.write_event(Event::Text(BytesText::new(t)))?;
            Ok(())
        }
        Node::CData(raw) => {
            writer.write_event(Event::CData(BytesCData::new(raw.as_str())))?;
            Ok(())
        }
        Node::Comment(raw) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))?;
            Ok(())
        }
        Node::Pi(raw) => {
            writer.write_event(Event::PI(BytesPI::new(raw.as_str())))?;
            Ok(())
        }
        Node::DocType(raw) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(raw.as_str())))?;
            Ok(())
        }
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    el: &Element,
    ctx: &NsContext,
    active_default: Option<&str>,
    is_root: bool,
) -> Result<(), XmlError> {
    let name = qualified_name(el, ctx);
    let mut start = BytesStart::new(name.clone());
    let mut child_default = active_default;

    if is_root {
        if let Some(default) = &ctx.default_ns {
            start.push_attribute(("xmlns", default.as_str()));
        }
        for (ns, prefix) in &ctx.prefixed {
            start.push_attribute((format!("xmlns:{prefix}").as_str(), ns.as_str()));
        }
        child_default = ctx.default_ns.as_deref();
    } else {
        // Redeclare the default namespace where an unprefixed name would
        // otherwise resolve against the wrong one.
        match &el.ns {
            None if active_default.is_some() => {
                start.push_attribute(("xmlns", ""));
                child_default = None;
            }
            Some(ns) if ctx.is_default(ns) && active_default != Some(ns.as_str()) => {
                start.push_attribute(("xmlns", ns.as_str()));
                child_default = Some(ns);
            }
            _ => {}
        }
    }

    for attr in &el.attrs {
        let key = match attr.ns.as_deref().and_then(|ns| ctx.prefix_for(ns)) {
            Some(prefix) => format!("{prefix}:{}", attr.local),
            None => attr.local.clone(),
        };
        start.push_attribute((key.as_str(), attr.value.as_str()));
    }

    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &el.children {
        match node {
            Node::Element(child) => write_element(writer, child, ctx, child_default, false)?,
            other => write_misc(writer, other)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn qualified_name(el: &Element, ctx: &NsContext) -> String {
    match el.ns.as_deref().and_then(|ns| ctx.prefix_for(ns)) {
        Some(prefix) => format!("{prefix}:{}", el.local),
        None => el.local.clone(),
    }
}
