//! Owned XML element tree plus the text reader and stream writer.
//!
//! The tree is the unit the stanza codecs operate on: element lookup is by
//! local name, first match only, and attributes keep their document order so
//! re-serialization of an element reproduces it verbatim. Namespaces are the
//! element's own `xmlns` declaration; extension elements always carry theirs
//! inline on the wire, so no prefix resolution happens at this layer.

pub mod builder;
pub mod error;
mod reader;
mod writer;

pub use builder::ElementBuilder;
pub use error::{Result, XmlError};
pub use reader::parse;
pub use writer::XmlWriter;

use std::fmt;

/// Attributes stored as key/value pairs in document order.
/// A Vec keeps serialization deterministic and is plenty fast for the
/// handful of attributes a stanza child carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attrs(pub Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Insert a key-value pair. If the key already exists, update the value.
    pub fn insert(&mut self, key: String, value: impl Into<String>) {
        let value = value.into();
        if let Some(pos) = self.0.iter().position(|(k, _)| k == &key) {
            self.0[pos].1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Push a key-value pair without checking for duplicates.
    /// Use this when building from a known-unique source (e.g. the reader).
    pub fn push(&mut self, key: String, value: impl Into<String>) {
        self.0.push((key, value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One child of an element: either a nested element or a run of character
/// data. Mixed content matters for XHTML fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<XmlChild>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    /// The element's own `xmlns` declaration, or "" when it has none.
    pub fn namespace(&self) -> &str {
        self.attrs.get("xmlns").unwrap_or("")
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.insert(key.to_string(), value);
    }

    /// Concatenated direct text content, ignoring nested elements.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlChild::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// Direct child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text(_) => None,
        })
    }

    /// Finds the first direct child element with the given local name.
    pub fn first_child(&self, tag: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.tag == tag)
    }

    /// First child with the given name, kept only when its namespace matches.
    /// The name lookup happens before the namespace check, so a same-named
    /// element in a foreign namespace shadows a later match.
    pub fn first_child_in(&self, tag: &str, namespace: &str) -> Option<&Element> {
        self.first_child(tag).filter(|e| e.namespace() == namespace)
    }

    pub fn push_element(&mut self, child: Element) {
        self.children.push(XmlChild::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlChild::Text(text.into()));
    }

    /// Serialize this element and its subtree through the stream writer,
    /// attributes in stored order.
    pub fn to_xml(&self, writer: &mut XmlWriter) {
        writer.start_element(&self.tag);
        for (key, value) in self.attrs.iter() {
            writer.attribute(key, value);
        }
        for child in &self.children {
            match child {
                XmlChild::Element(e) => e.to_xml(writer),
                XmlChild::Text(t) => writer.characters(t),
            }
        }
        writer.end_element();
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = XmlWriter::new();
        self.to_xml(&mut writer);
        f.write_str(&writer.into_string())
    }
}
