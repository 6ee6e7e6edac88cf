use quick_xml::escape::escape;

/// Streaming XML writer over an in-memory buffer.
///
/// Mirrors the usual stream-writer contract: `start_element` leaves the tag
/// open so attributes can follow; the first content call (characters, raw,
/// nested element) closes it. An element with no content collapses to the
/// self-closing form.
#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
    stack: Vec<String>,
    pending_start: bool,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_pending(&mut self) {
        if self.pending_start {
            self.out.push('>');
            self.pending_start = false;
        }
    }

    pub fn start_element(&mut self, tag: &str) {
        self.close_pending();
        self.out.push('<');
        self.out.push_str(tag);
        self.stack.push(tag.to_string());
        self.pending_start = true;
    }

    /// Writes an attribute on the currently open start tag. Calls after the
    /// element has received content are ignored.
    pub fn attribute(&mut self, key: &str, value: &str) {
        if !self.pending_start {
            debug_assert!(false, "attribute {key:?} written outside a start tag");
            return;
        }
        self.out.push(' ');
        self.out.push_str(key);
        self.out.push_str("=\"");
        self.out.push_str(&escape(value));
        self.out.push('"');
    }

    /// Escaped character data.
    pub fn characters(&mut self, text: &str) {
        self.close_pending();
        self.out.push_str(&escape(text));
    }

    /// Verbatim markup, no escaping. Used for stored XHTML fragments that
    /// are already serialized.
    pub fn raw(&mut self, markup: &str) {
        self.close_pending();
        self.out.push_str(markup);
    }

    pub fn empty_element(&mut self, tag: &str) {
        self.close_pending();
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push_str("/>");
    }

    pub fn end_element(&mut self) {
        let Some(tag) = self.stack.pop() else {
            debug_assert!(false, "end_element without matching start_element");
            return;
        };
        if self.pending_start {
            self.out.push_str("/>");
            self.pending_start = false;
        } else {
            self.out.push_str("</");
            self.out.push_str(&tag);
            self.out.push('>');
        }
    }

    pub fn into_string(self) -> String {
        debug_assert!(self.stack.is_empty(), "unclosed elements in writer");
        self.out
    }
}
