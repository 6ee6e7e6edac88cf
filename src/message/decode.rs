//! Element tree → [`Message`]. Permissive by design: malformed or missing
//! optional children resolve to their defaults and never abort the parse.

use super::registry::is_known_child;
use super::{CHAT_STATES, HINTS, MARKERS, Message, MessageType, MucInvitation, StampFormat};
use crate::ns;
use crate::xml::{Element, XmlChild, XmlWriter};
use chrono::{DateTime, NaiveDateTime, Utc};

impl Message {
    /// Decodes a `<message>` stanza. The caller is responsible for having
    /// matched the root tag and stream namespace.
    pub fn from_xml(element: &Element) -> Message {
        let mut m = Message::new();
        m.stanza.parse_envelope(element);

        m.kind = element
            .attr("type")
            .and_then(MessageType::from_wire)
            .unwrap_or(MessageType::Normal);

        m.body = element
            .first_child("body")
            .map(|e| e.text())
            .unwrap_or_default();
        m.subject = element
            .first_child("subject")
            .map(|e| e.text())
            .unwrap_or_default();
        m.thread = element
            .first_child("thread")
            .map(|e| e.text())
            .unwrap_or_default();

        // chat state: scan order is the table order, first match wins
        for (state, name) in CHAT_STATES {
            if element.first_child_in(name, ns::CHAT_STATES).is_some() {
                m.state = state;
                break;
            }
        }

        if let Some(html) = element.first_child_in("html", ns::XHTML_IM) {
            if let Some(body) = html.first_child_in("body", ns::XHTML) {
                m.xhtml = extract_xhtml(body);
            }
        }

        // delivery receipts; an absent element clears any prior receipt id
        if let Some(received) = element.first_child_in("received", ns::RECEIPTS) {
            let id = received.attr("id").unwrap_or_default();
            // compatibility with the old-style XEP: fall back to the stanza id
            m.receipt_id = if id.is_empty() {
                m.stanza.id.clone()
            } else {
                id.to_string()
            };
        } else {
            m.receipt_id.clear();
        }
        m.receipt_requested = element
            .first_child("request")
            .map(|e| e.namespace() == ns::RECEIPTS)
            .unwrap_or(false);

        if let Some(delay) = element.first_child_in("delay", ns::DELAY) {
            if let Some(stamp) = parse_stamp(delay.attr("stamp").unwrap_or_default()) {
                m.stamp = Some(stamp);
                m.stamp_format = StampFormat::Delay;
            }
        }

        if let Some(result) = element.first_child_in("result", ns::ARCHIVE) {
            if let Some(envelope) = result.first_child_in("forwarded", ns::FORWARDING) {
                m.archived = parse_forwarded(envelope).map(Box::new);
            }
        }

        // carbons: received and sent wrappers both land in the same field
        for wrapper in ["received", "sent"] {
            if let Some(carbon) = element.first_child_in(wrapper, ns::CARBONS) {
                if let Some(envelope) = carbon.first_child_in("forwarded", ns::FORWARDING) {
                    m.carbon = parse_forwarded(envelope).map(Box::new);
                }
            }
        }

        if let Some(envelope) = element.first_child_in("forwarded", ns::FORWARDING) {
            m.forwarded = parse_forwarded(envelope).map(Box::new);
        }

        m.attention_requested = element
            .first_child("attention")
            .map(|e| e.namespace() == ns::ATTENTION)
            .unwrap_or(false);

        for (hint, name) in HINTS {
            if element.first_child_in(name, ns::HINTS).is_some() {
                m.hints.push(hint);
            }
        }

        m.markable = element.first_child("markable").is_some();
        for (marker, name) in MARKERS {
            if let Some(found) = element.first_child_in(name, ns::CHAT_MARKERS) {
                m.marker = marker;
                m.marked_id = found.attr("id").unwrap_or_default().to_string();
                m.marked_thread = found.attr("thread").unwrap_or_default().to_string();
                break;
            }
        }

        if let Some(replace) = element.first_child_in("replace", ns::CORRECTION) {
            m.replace_id = Some(replace.attr("id").unwrap_or_default().to_string());
        }

        // single ordered pass for `x`-routing and opaque extensions
        let mut extensions = Vec::new();
        for child in element.child_elements() {
            if child.tag == "x" {
                match child.namespace() {
                    ns::LEGACY_DELAY => {
                        // XEP-0203 wins; legacy is a fallback, not a second source
                        if m.stamp.is_none() {
                            if let Some(stamp) =
                                parse_legacy_stamp(child.attr("stamp").unwrap_or_default())
                            {
                                m.stamp = Some(stamp);
                                m.stamp_format = StampFormat::LegacyDelay;
                            }
                        }
                    }
                    ns::CONFERENCE => {
                        m.muc_invitation = Some(MucInvitation {
                            jid: child.attr("jid").unwrap_or_default().to_string(),
                            password: child.attr("password").unwrap_or_default().to_string(),
                            reason: child.attr("reason").unwrap_or_default().to_string(),
                            direct: true,
                        });
                    }
                    _ => extensions.push(child.clone()),
                }
            } else if is_feature_child(child) || is_known_child(child) {
                // claimed by a feature field or registry-known: never opaque
            } else {
                extensions.push(child.clone());
            }
        }
        m.stanza.extensions = extensions;

        m
    }
}

/// Children consumed by feature fields whose (name, namespace) pairs are not
/// in the registry table.
fn is_feature_child(element: &Element) -> bool {
    let namespace = element.namespace();
    match element.tag.as_str() {
        // consumed by the envelope decoder
        "error" => true,
        "result" => namespace == ns::ARCHIVE,
        "forwarded" => namespace == ns::FORWARDING,
        "received" | "sent" if namespace == ns::CARBONS => true,
        // markable is recognized in any namespace, like the decode step
        "markable" => true,
        "replace" => namespace == ns::CORRECTION,
        _ => {
            (namespace == ns::HINTS && HINTS.iter().any(|(_, name)| *name == element.tag))
                || (namespace == ns::CHAT_MARKERS
                    && MARKERS.iter().any(|(_, name)| *name == element.tag))
        }
    }
}

/// Shared extraction for forwarding, archive results and carbons: decode the
/// embedded `<message>`, then let a `<delay>` on the wrapper itself override
/// the inner timestamp. Returns `None` when the wrapper namespace is wrong.
fn parse_forwarded(envelope: &Element) -> Option<Message> {
    if envelope.namespace() != ns::FORWARDING {
        return None;
    }
    let mut fwd = match envelope.first_child("message") {
        Some(message) => Message::from_xml(message),
        None => Message::from_xml(&Element::new("message")),
    };
    if let Some(delay) = envelope.first_child_in("delay", ns::DELAY) {
        if let Some(stamp) = parse_stamp(delay.attr("stamp").unwrap_or_default()) {
            fwd.stamp = Some(stamp);
            fwd.stamp_format = StampFormat::Delay;
        }
    }
    Some(fwd)
}

/// XEP-0082 datetime. Unparsable text yields `None`; the caller leaves the
/// field unset rather than failing the decode.
fn parse_stamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(stamp) => Some(stamp.with_timezone(&Utc)),
        Err(err) => {
            log::warn!("ignoring unparsable delay stamp {value:?}: {err}");
            None
        }
    }
}

/// XEP-0091 legacy stamp, `yyyyMMddThh:mm:ss` in UTC.
fn parse_legacy_stamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    match NaiveDateTime::parse_from_str(value, "%Y%m%dT%H:%M:%S") {
        Ok(naive) => Some(naive.and_utc()),
        Err(err) => {
            log::warn!("ignoring unparsable legacy delay stamp {value:?}: {err}");
            None
        }
    }
}

/// Serializes the inner markup of an XHTML `<body>`, stripping the namespace
/// declarations and trimming surrounding whitespace.
fn extract_xhtml(body: &Element) -> String {
    let mut writer = XmlWriter::new();
    for child in &body.children {
        match child {
            XmlChild::Element(e) => e.to_xml(&mut writer),
            XmlChild::Text(t) => writer.characters(t),
        }
    }
    writer
        .into_string()
        .replace(" xmlns=\"http://www.w3.org/1999/xhtml\"", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ChatState, Marker};
    use crate::xml::parse;

    fn decode(input: &str) -> Message {
        Message::from_xml(&parse(input).expect("well-formed fixture"))
    }

    #[test]
    fn test_type_attribute_defaults_to_normal() {
        assert_eq!(decode("<message/>").kind, MessageType::Normal);
        assert_eq!(
            decode("<message type=\"groupchat\"/>").kind,
            MessageType::GroupChat
        );
        assert_eq!(decode("<message type=\"bogus\"/>").kind, MessageType::Normal);
    }

    #[test]
    fn test_body_subject_thread() {
        let m = decode(
            "<message><subject>s</subject><body>hello</body><thread>t1</thread></message>",
        );
        assert_eq!(m.subject, "s");
        assert_eq!(m.body, "hello");
        assert_eq!(m.thread, "t1");
    }

    #[test]
    fn test_chat_state_requires_namespace() {
        let m = decode(
            "<message><composing xmlns=\"http://jabber.org/protocol/chatstates\"/></message>",
        );
        assert_eq!(m.state, ChatState::Composing);

        // a foreign-namespace twin is ignored and not kept as an extension
        let m = decode("<message><composing xmlns=\"urn:example:0\"/></message>");
        assert_eq!(m.state, ChatState::None);
        assert!(m.stanza.extensions.is_empty());
    }

    #[test]
    fn test_xhtml_extraction_strips_wrapper_and_namespace() {
        let m = decode(
            "<message><html xmlns=\"http://jabber.org/protocol/xhtml-im\">\
             <body xmlns=\"http://www.w3.org/1999/xhtml\"> <p>hi <b>there</b></p> </body>\
             </html></message>",
        );
        assert_eq!(m.xhtml, "<p>hi <b>there</b></p>");
    }

    #[test]
    fn test_receipt_id_falls_back_to_stanza_id() {
        let m = decode(
            "<message id=\"abc123\">\
             <received xmlns=\"urn:xmpp:receipts\" id=\"\"/></message>",
        );
        assert_eq!(m.receipt_id, "abc123");

        let m = decode(
            "<message id=\"abc123\">\
             <received xmlns=\"urn:xmpp:receipts\" id=\"orig-9\"/></message>",
        );
        assert_eq!(m.receipt_id, "orig-9");
    }

    #[test]
    fn test_receipt_request_presence() {
        let m = decode("<message><request xmlns=\"urn:xmpp:receipts\"/></message>");
        assert!(m.receipt_requested);
        let m = decode("<message><request xmlns=\"urn:example:0\"/></message>");
        assert!(!m.receipt_requested);
    }

    #[test]
    fn test_modern_stamp_beats_legacy() {
        let m = decode(
            "<message>\
             <x xmlns=\"jabber:x:delay\" stamp=\"20190101T10:00:00\"/>\
             <delay xmlns=\"urn:xmpp:delay\" stamp=\"2020-01-01T00:00:00Z\"/>\
             </message>",
        );
        assert_eq!(m.stamp_format, StampFormat::Delay);
        assert_eq!(
            m.stamp,
            Some(
                DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
                    .expect("valid fixture")
                    .with_timezone(&Utc)
            )
        );
    }

    #[test]
    fn test_legacy_stamp_alone() {
        let m = decode(
            "<message><x xmlns=\"jabber:x:delay\" stamp=\"20200101T12:30:00\"/></message>",
        );
        assert_eq!(m.stamp_format, StampFormat::LegacyDelay);
        assert_eq!(
            m.stamp,
            Some(
                DateTime::parse_from_rfc3339("2020-01-01T12:30:00Z")
                    .expect("valid fixture")
                    .with_timezone(&Utc)
            )
        );
        assert!(m.stanza.extensions.is_empty());
    }

    #[test]
    fn test_unparsable_stamp_is_absent() {
        let m = decode(
            "<message><delay xmlns=\"urn:xmpp:delay\" stamp=\"not a date\"/></message>",
        );
        assert!(m.stamp.is_none());
    }

    #[test]
    fn test_direct_muc_invitation() {
        let m = decode(
            "<message><x xmlns=\"jabber:x:conference\" jid=\"room@muc.example.org\" \
             password=\"pw\" reason=\"come\"/></message>",
        );
        let invite = m.muc_invitation.expect("invitation parsed");
        assert_eq!(invite.jid, "room@muc.example.org");
        assert_eq!(invite.password, "pw");
        assert_eq!(invite.reason, "come");
        assert!(invite.direct);
        assert!(m.stanza.extensions.is_empty());
    }

    #[test]
    fn test_unknown_x_child_is_an_extension() {
        let m = decode("<message><x xmlns=\"jabber:x:data\" type=\"form\"/></message>");
        assert_eq!(m.stanza.extensions.len(), 1);
        assert_eq!(m.stanza.extensions[0].tag, "x");
    }

    #[test]
    fn test_markers_first_match() {
        let m = decode(
            "<message>\
             <markable xmlns=\"urn:xmpp:chat-markers:0\"/>\
             <displayed xmlns=\"urn:xmpp:chat-markers:0\" id=\"m5\" thread=\"t\"/>\
             </message>",
        );
        assert!(m.markable);
        assert_eq!(m.marker, Marker::Displayed);
        assert_eq!(m.marked_id, "m5");
        assert_eq!(m.marked_thread, "t");
        assert!(m.stanza.extensions.is_empty());
    }

    #[test]
    fn test_replace_requires_namespace() {
        let m = decode(
            "<message><replace xmlns=\"urn:xmpp:message-correct:0\" id=\"old-1\"/></message>",
        );
        assert_eq!(m.replace_id.as_deref(), Some("old-1"));

        let m = decode("<message><replace xmlns=\"urn:example:0\" id=\"old-1\"/></message>");
        assert!(m.replace_id.is_none());
        assert_eq!(m.stanza.extensions.len(), 1);
    }

    #[test]
    fn test_carbon_with_wrapper_delay() {
        let m = decode(
            "<message>\
             <received xmlns=\"urn:xmpp:carbons:2\">\
             <forwarded xmlns=\"urn:xmpp:forward:0\">\
             <delay xmlns=\"urn:xmpp:delay\" stamp=\"2020-01-01T00:00:00Z\"/>\
             <message type=\"chat\"><body>hi</body></message>\
             </forwarded></received></message>",
        );
        let carbon = m.carbon.expect("carbon parsed");
        assert_eq!(carbon.body, "hi");
        assert_eq!(carbon.kind, MessageType::Chat);
        assert_eq!(carbon.stamp_format, StampFormat::Delay);
        assert_eq!(
            carbon.stamp,
            Some(
                DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
                    .expect("valid fixture")
                    .with_timezone(&Utc)
            )
        );
        // the carbons wrapper itself never lands in extensions
        assert!(m.stanza.extensions.is_empty());
    }

    #[test]
    fn test_extension_order_preserved() {
        let m = decode(
            "<message>\
             <one xmlns=\"urn:example:1\"/>\
             <body>hi</body>\
             <two xmlns=\"urn:example:2\" k=\"v\"/>\
             <three xmlns=\"urn:example:3\"/>\
             </message>",
        );
        let tags: Vec<_> = m.stanza.extensions.iter().map(|e| e.tag.clone()).collect();
        assert_eq!(tags, ["one", "two", "three"]);
    }
}
