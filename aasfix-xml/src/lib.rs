//! A small namespace-aware XML element tree built on `quick-xml`.
//!
//! The fixers need to rewrite individual nodes of a part's XML content
//! without disturbing unrelated markup, which streaming APIs make awkward.
//! This crate parses a part's bytes into a [`Document`] of [`Element`]s with
//! namespaces resolved, lets callers mutate the tree, and serializes it back.
//!
//! Namespace *identity* is preserved; the byte layout of prefixes is not.
//! Prefix declarations are consumed at parse time and re-synthesized at
//! write time, so an element whose namespace was rewritten serializes under
//! the new namespace with its local name, attributes, children and
//! surrounding text untouched.

mod error;
mod parse;
mod serialize;

pub use error::XmlError;

/// The XML declaration of a document, re-emitted on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed XML document: optional declaration, prolog/epilog misc nodes,
/// and exactly one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub decl: Option<Decl>,
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XmlError> {
        parse::parse(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, XmlError> {
        serialize::serialize(self)
    }
}

/// A node in the tree. Text is stored unescaped; comments, CDATA sections,
/// processing instructions and doctype declarations are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Pi(String),
    DocType(String),
}

/// An attribute with its namespace resolved. Unprefixed attributes have no
/// namespace per the XML namespaces rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub ns: Option<String>,
    pub local: String,
    pub value: String,
}

/// An element with its namespace resolved from the prefix declarations in
/// scope at parse time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub ns: Option<String>,
    pub local: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(ns: Option<&str>, local: &str) -> Self {
        Self {
            ns: ns.map(str::to_owned),
            local: local.to_owned(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Whether this element has the given namespace and local name.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local == local
    }

    /// Value of the unprefixed attribute `local`, if present.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns.is_none() && a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Sets the unprefixed attribute `local`, appending it if absent.
    pub fn set_attr(&mut self, local: &str, value: &str) {
        match self.attrs.iter_mut().find(|a| a.ns.is_none() && a.local == local) {
            Some(attr) => attr.value = value.to_owned(),
            None => self.attrs.push(Attr {
                ns: None,
                local: local.to_owned(),
                value: value.to_owned(),
            }),
        }
    }

    /// Direct element children, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Direct children with the given namespace and local name.
    pub fn children_named<'a, 'b>(
        &'a self,
        ns: &'b str,
        local: &'b str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'b> {
        self.child_elements().filter(move |el| el.is(ns, local))
    }

    pub fn children_named_mut<'a, 'b>(
        &'a mut self,
        ns: &'b str,
        local: &'b str,
    ) -> impl Iterator<Item = &'a mut Element> + use<'a, 'b> {
        self.child_elements_mut().filter(move |el| el.is(ns, local))
    }

    /// First direct child with the given namespace and local name.
    pub fn find_child(&self, ns: &str, local: &str) -> Option<&Element> {
        self.children_named(ns, local).next()
    }

    pub fn find_child_mut(&mut self, ns: &str, local: &str) -> Option<&mut Element> {
        self.children_named_mut(ns, local).next()
    }

    /// Concatenated character data of direct text and CDATA children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, value: &str) {
        self.children = vec![Node::Text(value.to_owned())];
    }

    /// Visits this element and every descendant element, pre-order.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for node in &mut self.children {
            if let Node::Element(el) = node {
                el.walk_mut(f);
            }
        }
    }

    /// Removes every descendant element for which `keep` returns false.
    /// The element itself is never removed.
    pub fn retain_descendants(&mut self, keep: &mut impl FnMut(&Element) -> bool) {
        self.children.retain(|node| match node {
            Node::Element(el) => keep(el),
            _ => true,
        });
        for node in &mut self.children {
            if let Node::Element(el) = node {
                el.retain_descendants(keep);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NS: &str = "https://example.com/ns";

    fn parse(xml: &str) -> Document {
        Document::from_bytes(xml.as_bytes()).expect("parse")
    }

    #[test]
    fn resolves_default_and_prefixed_namespaces() {
        let doc = parse(
            r#"<a xmlns="https://example.com/ns" xmlns:o="https://example.com/other">
                 <b/><o:c/>
               </a>"#,
        );
        assert!(doc.root.is(NS, "a"));
        assert!(doc.root.find_child(NS, "b").is_some());
        assert!(doc.root.find_child("https://example.com/other", "c").is_some());
    }

    #[test]
    fn attributes_and_text_are_unescaped() {
        let doc = parse(r#"<a xmlns="https://example.com/ns" t="x &amp; y">1 &lt; 2</a>"#);
        assert_eq!(doc.root.attr("t"), Some("x & y"));
        assert_eq!(doc.root.text(), "1 < 2");
    }

    #[test]
    fn roundtrip_preserves_text_and_comments() {
        let xml = concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n<a xmlns=\"https://example.com/ns\">\n  <!-- note -->\n  <b>v &amp; w</b>\n</a>"
        );
        let doc = parse(xml);
        let out = String::from_utf8(doc.to_bytes().expect("serialize")).expect("utf8");
        assert_eq!(out, xml);
    }

    #[test]
    fn serialization_is_deterministic() {
        let xml = r#"<a xmlns:p="https://example.com/ns"><p:b k="1"/><p:b k="2"/></a>"#;
        let doc = parse(xml);
        let once = doc.to_bytes().expect("serialize");
        let again = Document::from_bytes(&once).expect("reparse").to_bytes().expect("serialize");
        assert_eq!(once, again);
    }

    #[test]
    fn rewritten_namespace_serializes_under_new_uri() {
        let mut doc = parse(r#"<old1:Foo xmlns:old1="https://admin-shell.io/aas/1/0"><old1:Bar a="1"/></old1:Foo>"#);
        doc.root.walk_mut(&mut |el| el.ns = Some("https://admin-shell.io/aas/3/0".to_owned()));
        let out = String::from_utf8(doc.to_bytes().expect("serialize")).expect("utf8");
        let reparsed = Document::from_bytes(out.as_bytes()).expect("reparse");
        assert!(reparsed.root.is("https://admin-shell.io/aas/3/0", "Foo"));
        let bar = reparsed
            .root
            .find_child("https://admin-shell.io/aas/3/0", "Bar")
            .expect("Bar");
        assert_eq!(bar.attr("a"), Some("1"));
        assert!(!out.contains("aas/1/0"));
    }

    #[test]
    fn retain_descendants_removes_matching_nodes() {
        let mut doc = parse(
            r#"<a xmlns="https://example.com/ns"><b><drop/></b><drop/><c/></a>"#,
        );
        let mut removed = 0u64;
        doc.root.retain_descendants(&mut |el| {
            if el.is(NS, "drop") {
                removed += 1;
                false
            } else {
                true
            }
        });
        assert_eq!(removed, 2);
        let out = String::from_utf8(doc.to_bytes().expect("serialize")).expect("utf8");
        assert!(!out.contains("drop"));
        assert!(out.contains("<c/>"));
    }

    #[test]
    fn unbound_prefix_is_an_error() {
        let err = Document::from_bytes(b"<p:a xmlns=\"x\"/>").unwrap_err();
        assert!(matches!(err, XmlError::UnboundPrefix(p) if p == "p"));
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(
            Document::from_bytes(b"  ").unwrap_err(),
            XmlError::NoRoot
        ));
    }
}
