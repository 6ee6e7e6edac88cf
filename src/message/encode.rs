//! [`Message`] → wire XML. Emission order is fixed and not configurable;
//! peers may be strict about element ordering.

use super::{HINTS, Marker, Message, StampFormat};
use crate::ns;
use crate::xml::XmlWriter;
use chrono::{DateTime, SecondsFormat, Utc};

impl Message {
    /// Writes the complete `<message>` element.
    pub fn to_xml(&self, writer: &mut XmlWriter) {
        writer.start_element("message");
        self.stanza.write_envelope_attributes(writer);
        writer.attribute("type", self.kind.wire_name());

        if !self.subject.is_empty() {
            text_element(writer, "subject", &self.subject);
        }
        if !self.body.is_empty() {
            text_element(writer, "body", &self.body);
        }
        if !self.thread.is_empty() {
            text_element(writer, "thread", &self.thread);
        }
        if let Some(error) = &self.stanza.error {
            error.to_xml(writer);
        }

        if let Some(name) = self.state.wire_name() {
            writer.start_element(name);
            writer.attribute("xmlns", ns::CHAT_STATES);
            writer.end_element();
        }

        if !self.xhtml.is_empty() {
            writer.start_element("html");
            writer.attribute("xmlns", ns::XHTML_IM);
            writer.start_element("body");
            writer.attribute("xmlns", ns::XHTML);
            // stored fragment is already markup; no further escaping
            writer.raw(&self.xhtml);
            writer.end_element();
            writer.end_element();
        }

        if let Some(stamp) = self.stamp {
            match self.stamp_format {
                StampFormat::Delay => {
                    writer.start_element("delay");
                    writer.attribute("xmlns", ns::DELAY);
                    writer.attribute("stamp", &format_stamp(stamp));
                    writer.end_element();
                }
                StampFormat::LegacyDelay => {
                    writer.start_element("x");
                    writer.attribute("xmlns", ns::LEGACY_DELAY);
                    writer.attribute("stamp", &stamp.format("%Y%m%dT%H:%M:%S").to_string());
                    writer.end_element();
                }
            }
        }

        if !self.receipt_id.is_empty() {
            writer.start_element("received");
            writer.attribute("xmlns", ns::RECEIPTS);
            writer.attribute("id", &self.receipt_id);
            writer.end_element();
        }
        if self.receipt_requested {
            writer.start_element("request");
            writer.attribute("xmlns", ns::RECEIPTS);
            writer.end_element();
        }

        if let Some(forwarded) = &self.forwarded {
            write_forwarding_envelope(writer, forwarded);
        }
        if let Some(archived) = &self.archived {
            writer.start_element("result");
            writer.attribute("xmlns", ns::ARCHIVE);
            write_forwarding_envelope(writer, archived);
            writer.end_element();
        }
        if let Some(carbon) = &self.carbon {
            writer.start_element("received");
            writer.attribute("xmlns", ns::CARBONS);
            write_forwarding_envelope(writer, carbon);
            writer.end_element();
        }

        if self.attention_requested {
            writer.start_element("attention");
            writer.attribute("xmlns", ns::ATTENTION);
            writer.end_element();
        }

        if let Some(invite) = &self.muc_invitation {
            if invite.direct {
                writer.start_element("x");
                writer.attribute("xmlns", ns::CONFERENCE);
                if !invite.jid.is_empty() {
                    writer.attribute("jid", &invite.jid);
                }
                if !invite.password.is_empty() {
                    writer.attribute("password", &invite.password);
                }
                if !invite.reason.is_empty() {
                    writer.attribute("reason", &invite.reason);
                }
                writer.end_element();
            } else {
                writer.start_element("x");
                writer.attribute("xmlns", ns::MUC_USER);
                writer.start_element("invite");
                writer.attribute("to", &invite.jid);
                text_element(writer, "reason", &invite.reason);
                writer.end_element();
                writer.end_element();
            }
        }

        for (hint, name) in HINTS {
            if self.has_hint(hint) {
                writer.start_element(name);
                writer.attribute("xmlns", ns::HINTS);
                writer.end_element();
            }
        }

        if self.markable {
            writer.start_element("markable");
            writer.attribute("xmlns", ns::CHAT_MARKERS);
            writer.end_element();
        }
        if self.marker != Marker::None {
            if let Some(name) = self.marker.wire_name() {
                writer.start_element(name);
                writer.attribute("xmlns", ns::CHAT_MARKERS);
                writer.attribute("id", &self.marked_id);
                if !self.marked_thread.is_empty() {
                    writer.attribute("thread", &self.marked_thread);
                }
                writer.end_element();
            }
        }

        if let Some(replace_id) = &self.replace_id {
            // the wire protocol needs an explicit empty body so peers do not
            // treat a correction-with-empty-body as "no body field"
            if self.body.is_empty() {
                writer.empty_element("body");
            }
            writer.start_element("replace");
            writer.attribute("id", replace_id);
            writer.attribute("xmlns", ns::CORRECTION);
            writer.end_element();
        }

        self.stanza.extensions_to_xml(writer);

        writer.end_element();
    }

    /// Serializes to a standalone XML string.
    pub fn serialize(&self) -> String {
        let mut writer = XmlWriter::new();
        self.to_xml(&mut writer);
        writer.into_string()
    }
}

/// Wraps an embedded message in a stanza-forwarding envelope. The inner
/// message carries its own timestamp, so the wrapper needs no `delay`.
fn write_forwarding_envelope(writer: &mut XmlWriter, message: &Message) {
    writer.start_element("forwarded");
    writer.attribute("xmlns", ns::FORWARDING);
    message.to_xml(writer);
    writer.end_element();
}

fn text_element(writer: &mut XmlWriter, tag: &str, text: &str) {
    writer.start_element(tag);
    writer.characters(text);
    writer.end_element();
}

/// XEP-0082 datetime with millisecond precision, always UTC.
fn format_stamp(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
