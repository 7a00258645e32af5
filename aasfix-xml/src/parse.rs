//! Event-stream parsing into the element tree.

use crate::{Attr, Decl, Document, Element, Node, XmlError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// One namespace declaration: `None` is the default namespace, and an empty
/// URI undeclares it.
type Scope = Vec<(Option<String>, String)>;

struct TreeBuilder {
    scopes: Vec<Scope>,
    stack: Vec<Element>,
    decl: Option<Decl>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Document, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    let mut builder = TreeBuilder {
        scopes: Vec::new(),
        stack: Vec::new(),
        decl: None,
        prolog: Vec::new(),
        root: None,
        epilog: Vec::new(),
    };

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let elem = builder.open(e)?;
                builder.stack.push(elem);
            }
            Event::Empty(ref e) => {
                let elem = builder.open(e)?;
                builder.scopes.pop();
                builder.close(elem)?;
            }
            Event::End(_) => {
                let elem = builder.stack.pop().ok_or(XmlError::Malformed("unbalanced end tag"))?;
                builder.scopes.pop();
                builder.close(elem)?;
            }
            Event::Text(ref e) => {
                let text = e.unescape()?.into_owned();
                builder.push_node(Node::Text(text));
            }
            Event::CData(ref e) => {
                let raw = std::str::from_utf8(e)?.to_owned();
                builder.push_node(Node::CData(raw));
            }
            Event::Comment(ref e) => {
                let raw = std::str::from_utf8(e)?.to_owned();
                builder.push_node(Node::Comment(raw));
            }
            Event::PI(ref e) => {
                let raw = std::str::from_utf8(e)?.to_owned();
                builder.push_node(Node::Pi(raw));
            }
            Event::DocType(ref e) => {
                let raw = std::str::from_utf8(e)?.to_owned();
                builder.push_node(Node::DocType(raw));
            }
            Event::Decl(ref e) => {
                let version = std::str::from_utf8(&e.version()?)?.to_owned();
                let encoding = match e.encoding() {
                    Some(enc) => Some(std::str::from_utf8(&enc?)?.to_owned()),
                    None => None,
                };
                let standalone = match e.standalone() {
                    Some(sa) => Some(std::str::from_utf8(&sa?)?.to_owned()),
                    None => None,
                };
                builder.decl = Some(Decl {
                    version,
                    encoding,
                    standalone,
                });
            }
            Event::Eof => break,
        }
        buf.clear();
    }

    if !builder.stack.is_empty() {
        return Err(XmlError::Malformed("unclosed element"));
    }
    let root = builder.root.ok_or(XmlError::NoRoot)?;
    Ok(Document {
        decl: builder.decl,
        prolog: builder.prolog,
        root,
        epilog: builder.epilog,
    })
}

impl TreeBuilder {
    /// Consumes a start tag: collects its namespace declarations into a new
    /// scope frame, then resolves the element and attribute names against it.
    fn open(&mut self, e: &BytesStart<'_>) -> Result<Element, XmlError> {
        let mut scope: Scope = Vec::new();
        let mut plain: Vec<(String, String)> = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = attr.key.as_ref();
            let value = attr
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            if key == b"xmlns" {
                scope.push((None, value));
            } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                scope.push((Some(std::str::from_utf8(prefix)?.to_owned()), value));
            } else {
                plain.push((std::str::from_utf8(key)?.to_owned(), value));
            }
        }
        self.scopes.push(scope);

        let name = e.name();
        let (prefix, local) = split_qname(std::str::from_utf8(name.as_ref())?);
        let ns = self.resolve(prefix)?;

        let mut attrs = Vec::with_capacity(plain.len());
        for (name, value) in plain {
            let (prefix, local) = split_qname(&name);
            // An unprefixed attribute never takes the default namespace.
            let ns = match prefix {
                Some(p) => self.resolve(Some(p))?,
                None => None,
            };
            attrs.push(Attr {
                ns,
                local: local.to_owned(),
                value,
            });
        }

        Ok(Element {
            ns,
            local: local.to_owned(),
            attrs,
            children: Vec::new(),
        })
    }

    fn close(&mut self, elem: Element) -> Result<(), XmlError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(elem));
        } else if self.root.is_none() {
            self.root = Some(elem);
        } else {
            return Err(XmlError::Malformed("multiple root elements"));
        }
        Ok(())
    }

    fn push_node(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        } else if self.root.is_none() {
            self.prolog.push(node);
        } else {
            self.epilog.push(node);
        }
    }

    fn resolve(&self, prefix: Option<&str>) -> Result<Option<String>, XmlError> {
        if prefix == Some("xml") {
            return Ok(Some(XML_NS.to_owned()));
        }
        for scope in self.scopes.iter().rev() {
            for (declared, uri) in scope.iter().rev() {
                if declared.as_deref() == prefix {
                    return if uri.is_empty() {
                        Ok(None)
                    } else {
                        Ok(Some(uri.clone()))
                    };
                }
            }
        }
        match prefix {
            None => Ok(None),
            Some(p) => Err(XmlError::UnboundPrefix(p.to_owned())),
        }
    }
}

fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}
