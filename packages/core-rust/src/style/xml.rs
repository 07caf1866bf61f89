//! Namespace-resolved element tree built from `quick-xml` events.
//!
//! SLD documents are small, so the engine reads them into an owned tree and
//! walks it with path-like helpers instead of matching on a flat event stream.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::SldError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    /// Resolved namespace URI, `None` when unqualified.
    pub namespace: Option<String>,
    /// Local name without prefix.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    /// Whether this element has local `name` in one of `namespaces`.
    pub fn is(&self, namespaces: &[&str], name: &str) -> bool {
        self.name == name
            && self
                .namespace
                .as_deref()
                .is_some_and(|ns| namespaces.contains(&ns))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child matching `is(namespaces, name)`.
    pub fn child(&self, namespaces: &[&str], name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespaces, name))
    }

    /// Text content, whitespace-trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over an element's descendants.
pub(crate) struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parses `xml` into its root element.
pub(crate) fn parse(xml: &str) -> Result<Element, SldError> {
    let mut reader = NsReader::from_str(xml);
    let mut open: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(ref e))) => open.push(open_element(&ns, e)?),
            Ok((ns, Event::Empty(ref e))) => {
                let element = open_element(&ns, e)?;
                close_element(&mut open, &mut root, element);
            }
            Ok((_, Event::End(_))) => {
                let element = open.pop().ok_or(SldError::UnexpectedEnd)?;
                close_element(&mut open, &mut root, element);
            }
            Ok((_, Event::Text(ref e))) => {
                if let Some(current) = open.last_mut() {
                    let text = e.unescape().map_err(|e| SldError::Xml(e.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Ok((_, Event::CData(e))) => {
                if let Some(current) = open.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(SldError::Xml(e.to_string())),
            Ok(_) => {}
        }
    }

    if !open.is_empty() {
        return Err(SldError::UnexpectedEnd);
    }
    root.ok_or(SldError::Empty)
}

fn open_element(ns: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, SldError> {
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(SldError::Xml(format!(
                "unknown namespace prefix '{}'",
                String::from_utf8_lossy(prefix)
            )))
        }
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SldError::Xml(e.to_string()))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SldError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        namespace,
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn close_element(open: &mut [Element], root: &mut Option<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
