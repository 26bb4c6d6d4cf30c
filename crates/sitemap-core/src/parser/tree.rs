//! Minimal element tree built from `quick-xml` events.
//!
//! Only element local names and text survive; attributes, comments,
//! processing instructions and the doctype are dropped. Namespace
//! prefixes are stripped so lookups work whether or not the document
//! declares the sitemap namespace.

use crate::error::{ParseError, ParseOutcome};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Maximum length of the detail string carried by `InvalidXml`.
const DETAIL_LIMIT: usize = 100;

/// Deepest element nesting accepted. Traversal and drop both recurse per level.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub children: Vec<Node>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// First descendant (document order, excluding self) with the given local name.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Every element named `name`, anywhere below and including self, in document order.
    pub fn elements_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for child in self.child_elements() {
            child.elements_named(name, out);
        }
    }

    /// Every `child`-named element whose parent is named `parent`, in document order.
    pub fn children_of<'a>(&'a self, parent: &str, child: &str, out: &mut Vec<&'a Element>) {
        for el in self.child_elements() {
            if self.name == parent && el.name == child {
                out.push(el);
            }
            el.children_of(parent, child, out);
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => buf.push_str(t),
                Node::Element(el) => el.collect_text(buf),
            }
        }
    }
}

/// Parse a complete document into its root element.
pub(crate) fn build(xml: &str) -> ParseOutcome<Element> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(invalid("document has more than one root element"));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(invalid(format!(
                        "document nesting exceeds {MAX_DEPTH} levels"
                    )));
                }
                stack.push(Element::new(local_name(e)));
            }
            Ok(Event::Empty(ref e)) => {
                attach(&mut stack, &mut root, Element::new(local_name(e)))?;
            }
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| invalid("closing tag without matching opening tag"))?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|err| invalid(err.to_string()))?;
                push_text(&mut stack, text.into_owned())?;
            }
            Ok(Event::CData(ref e)) => {
                push_text(&mut stack, String::from_utf8_lossy(e).into_owned())?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(invalid(format!(
                    "{err} (at byte {})",
                    reader.error_position()
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(invalid(format!(
            "unexpected end of document, <{}> is not closed",
            open.name
        )));
    }

    root.ok_or_else(|| invalid("document has no root element"))
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> ParseOutcome<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => return Err(invalid("document has more than one root element")),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: String) -> ParseOutcome<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Text(text)),
        None if text.trim().is_empty() => {}
        None => return Err(invalid("text content outside of the root element")),
    }
    Ok(())
}

fn invalid(detail: impl Into<String>) -> ParseError {
    let detail: String = detail.into();
    ParseError::InvalidXml(detail.chars().take(DETAIL_LIMIT).collect())
}
