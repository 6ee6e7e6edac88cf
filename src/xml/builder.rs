use crate::xml::{Attrs, Element, XmlChild};

/// Fluent construction of element trees, mostly for outbound payloads and
/// test fixtures.
#[derive(Debug, Default)]
pub struct ElementBuilder {
    tag: String,
    attrs: Attrs,
    children: Vec<XmlChild>,
}

impl ElementBuilder {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attrs<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in attrs.into_iter() {
            self.attrs.insert(key.into(), value.into());
        }
        self
    }

    /// Appends a run of character data. Calls accumulate, so text and child
    /// elements interleave in call order.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlChild::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(XmlChild::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(XmlChild::Element));
        self
    }

    pub fn build(self) -> Element {
        Element {
            tag: self.tag,
            attrs: self.attrs,
            children: self.children,
        }
    }
}
