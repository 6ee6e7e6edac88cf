//! Generic stanza envelope: addressing, language, identifier, error payload
//! and the opaque extension list shared by all stanza kinds.

use crate::ns;
use crate::xml::{Element, XmlWriter};
use rand::RngCore;

/// Stanza-level error payload.
///
/// Wire format:
/// ```xml
/// <error type="cancel">
///   <item-not-found xmlns="urn:ietf:params:xml:ns:xmpp-stanzas"/>
///   <text xmlns="urn:ietf:params:xml:ns:xmpp-stanzas">gone</text>
/// </error>
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StanzaError {
    /// The `type` attribute (cancel, modify, auth, wait, continue).
    pub kind: String,
    /// Defined condition element name.
    pub condition: String,
    /// Optional human-readable text.
    pub text: String,
}

impl StanzaError {
    pub fn from_xml(element: &Element) -> Self {
        let kind = element.attr("type").unwrap_or_default().to_string();
        let condition = element
            .child_elements()
            .find(|c| c.namespace() == ns::STANZAS && c.tag != "text")
            .map(|c| c.tag.clone())
            .unwrap_or_default();
        let text = element
            .child_elements()
            .find(|c| c.tag == "text" && c.namespace() == ns::STANZAS)
            .map(|c| c.text())
            .unwrap_or_default();
        Self {
            kind,
            condition,
            text,
        }
    }

    pub fn to_xml(&self, writer: &mut XmlWriter) {
        writer.start_element("error");
        if !self.kind.is_empty() {
            writer.attribute("type", &self.kind);
        }
        if !self.condition.is_empty() {
            writer.start_element(&self.condition);
            writer.attribute("xmlns", ns::STANZAS);
            writer.end_element();
        }
        if !self.text.is_empty() {
            writer.start_element("text");
            writer.attribute("xmlns", ns::STANZAS);
            writer.characters(&self.text);
            writer.end_element();
        }
        writer.end_element();
    }
}

/// Envelope fields common to every stanza kind. Empty strings mean "absent";
/// the wire format cannot distinguish the two.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stanza {
    pub to: String,
    pub from: String,
    pub id: String,
    pub lang: String,
    pub error: Option<StanzaError>,
    /// Child elements not claimed by the owning codec, preserved in
    /// document order for re-emission.
    pub extensions: Vec<Element>,
}

impl Stanza {
    /// Fills the envelope from a stanza root element: addressing and
    /// language attributes plus the error payload.
    pub fn parse_envelope(&mut self, element: &Element) {
        self.to = element.attr("to").unwrap_or_default().to_string();
        self.from = element.attr("from").unwrap_or_default().to_string();
        self.id = element.attr("id").unwrap_or_default().to_string();
        self.lang = element.attr("xml:lang").unwrap_or_default().to_string();
        self.error = element.first_child("error").map(StanzaError::from_xml);
    }

    /// Writes the envelope attributes on an open root tag, skipping fields
    /// that are unset.
    pub fn write_envelope_attributes(&self, writer: &mut XmlWriter) {
        if !self.lang.is_empty() {
            writer.attribute("xml:lang", &self.lang);
        }
        if !self.id.is_empty() {
            writer.attribute("id", &self.id);
        }
        if !self.to.is_empty() {
            writer.attribute("to", &self.to);
        }
        if !self.from.is_empty() {
            writer.attribute("from", &self.from);
        }
    }

    /// Flushes the opaque extension list. Invoked once by the owning codec
    /// after all feature-specific children.
    pub fn extensions_to_xml(&self, writer: &mut XmlWriter) {
        for element in &self.extensions {
            element.to_xml(writer);
        }
    }

    /// Assigns a fresh unique identifier when none is set.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = generate_id();
        }
    }
}

/// A fresh stanza identifier from OS randomness. Safe under concurrent
/// callers; collisions across a session are not a practical concern at
/// 48 bits.
pub fn generate_id() -> String {
    let mut bytes = [0u8; 6];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
