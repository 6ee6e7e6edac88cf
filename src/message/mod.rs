//! Message stanza codec.
//!
//! A single [`Message`] value carries the stanza envelope plus every modeled
//! protocol extension: chat state, XHTML body, delivery receipts, both
//! delayed-delivery encodings, embedded messages (forwarding, archive
//! results, carbon copies), MUC invitations, processing hints, chat markers
//! and message correction. Child elements the codec does not model round-trip
//! untouched through the envelope's extension list.
//!
//! Decode is a permissive single pass: malformed or missing optional
//! children resolve to their defaults and never abort the parse. Encode is
//! infallible and emits children in a fixed order for interoperability with
//! peers that are strict about element ordering.

mod decode;
mod encode;
mod registry;

use crate::stanza::Stanza;
use chrono::{DateTime, Utc};

/// The `type` attribute of a message stanza.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Error,
    Normal,
    Chat,
    GroupChat,
    Headline,
}

/// Wire names in enum order; decode scans this table and falls back to
/// `Normal` when nothing matches.
pub(crate) const MESSAGE_TYPES: [(MessageType, &str); 5] = [
    (MessageType::Error, "error"),
    (MessageType::Normal, "normal"),
    (MessageType::Chat, "chat"),
    (MessageType::GroupChat, "groupchat"),
    (MessageType::Headline, "headline"),
];

impl MessageType {
    pub fn wire_name(self) -> &'static str {
        MESSAGE_TYPES
            .iter()
            .find(|(ty, _)| *ty == self)
            .map(|(_, name)| *name)
            .unwrap_or("normal")
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        MESSAGE_TYPES
            .iter()
            .find(|(_, name)| *name == value)
            .map(|(ty, _)| *ty)
    }
}

/// Chat state per XEP-0085. `None` means no state element is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    None,
    Active,
    Inactive,
    Gone,
    Composing,
    Paused,
}

/// Declaration order doubles as the decode scan order: the first element
/// whose name and namespace both match wins.
pub(crate) const CHAT_STATES: [(ChatState, &str); 5] = [
    (ChatState::Active, "active"),
    (ChatState::Inactive, "inactive"),
    (ChatState::Gone, "gone"),
    (ChatState::Composing, "composing"),
    (ChatState::Paused, "paused"),
];

impl ChatState {
    pub fn wire_name(self) -> Option<&'static str> {
        CHAT_STATES
            .iter()
            .find(|(state, _)| *state == self)
            .map(|(_, name)| *name)
    }
}

/// Which delayed-delivery encoding produced (or will carry) the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StampFormat {
    /// XEP-0091 `<x xmlns="jabber:x:delay">`, `yyyyMMddThh:mm:ss` in UTC.
    LegacyDelay,
    /// XEP-0203 `<delay xmlns="urn:xmpp:delay">`, XEP-0082 datetime.
    #[default]
    Delay,
}

/// Message processing hint per XEP-0334.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    NoPermanentStorage,
    NoStore,
    NoCopy,
    AllowPermanentStorage,
}

/// Emission iterates this table, so hints always serialize in enum order
/// regardless of insertion order.
pub(crate) const HINTS: [(Hint, &str); 4] = [
    (Hint::NoPermanentStorage, "no-permanent-storage"),
    (Hint::NoStore, "no-store"),
    (Hint::NoCopy, "no-copy"),
    (Hint::AllowPermanentStorage, "allow-permanent-storage"),
];

/// Chat marker kind per XEP-0333. `None` means no marker element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    Received,
    Displayed,
    Acknowledged,
}

pub(crate) const MARKERS: [(Marker, &str); 3] = [
    (Marker::Received, "received"),
    (Marker::Displayed, "displayed"),
    (Marker::Acknowledged, "acknowledged"),
];

impl Marker {
    pub fn wire_name(self) -> Option<&'static str> {
        MARKERS
            .iter()
            .find(|(marker, _)| *marker == self)
            .map(|(_, name)| *name)
    }
}

/// Multi-user chat invitation. `direct` selects between the XEP-0249 direct
/// form and the XEP-0045 mediated form on emission; decode only produces the
/// direct form.
#[derive(Debug, Clone, PartialEq)]
pub struct MucInvitation {
    pub jid: String,
    pub password: String,
    pub reason: String,
    pub direct: bool,
}

impl Default for MucInvitation {
    fn default() -> Self {
        Self {
            jid: String::new(),
            password: String::new(),
            reason: String::new(),
            direct: true,
        }
    }
}

/// A chat message stanza.
///
/// Plain value type: construction gives an empty outbound message of type
/// `Chat`; [`Message::from_xml`] fills one from a received element. Nested
/// messages are owned boxes, never shared, so re-encoding an outer record
/// cannot alias state with the record it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub stanza: Stanza,
    pub kind: MessageType,
    pub stamp: Option<DateTime<Utc>>,
    pub stamp_format: StampFormat,
    pub state: ChatState,
    pub attention_requested: bool,
    pub body: String,
    pub subject: String,
    pub thread: String,
    /// Pre-serialized XHTML-IM fragment, namespace-stripped.
    pub xhtml: String,
    /// When set, this message is a delivery receipt for the given stanza id.
    pub receipt_id: String,
    pub receipt_requested: bool,
    /// XEP-0297 top-level forwarded message.
    pub forwarded: Option<Box<Message>>,
    /// XEP-0313 message extracted from an archive result.
    pub archived: Option<Box<Message>>,
    /// XEP-0280 carbon-copied message.
    pub carbon: Option<Box<Message>>,
    pub muc_invitation: Option<MucInvitation>,
    pub hints: Vec<Hint>,
    pub markable: bool,
    pub marker: Marker,
    pub marked_id: String,
    pub marked_thread: String,
    /// XEP-0308: id of the message this one corrects.
    pub replace_id: Option<String>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            stanza: Stanza::default(),
            // outbound messages default to chat; decode overrides from the wire
            kind: MessageType::Chat,
            stamp: None,
            stamp_format: StampFormat::default(),
            state: ChatState::default(),
            attention_requested: false,
            body: String::new(),
            subject: String::new(),
            thread: String::new(),
            xhtml: String::new(),
            receipt_id: String::new(),
            receipt_requested: false,
            forwarded: None,
            archived: None,
            carbon: None,
            muc_invitation: None,
            hints: Vec::new(),
            markable: false,
            marker: Marker::default(),
            marked_id: String::new(),
            marked_thread: String::new(),
            replace_id: None,
        }
    }
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests (or withdraws) a delivery receipt. A receipt cannot be
    /// correlated without a stanza id, so requesting one assigns a fresh id
    /// when none is set.
    pub fn set_receipt_requested(&mut self, requested: bool) {
        self.receipt_requested = requested;
        if requested {
            self.stanza.ensure_id();
        }
    }

    /// Marks this message as a correction of the message with the given id.
    /// The body is left alone; an empty body still encodes explicitly so
    /// peers do not read the correction as "no body field".
    pub fn set_replace(&mut self, id: impl Into<String>) {
        self.replace_id = Some(id.into());
    }

    pub fn is_replace(&self) -> bool {
        self.replace_id.is_some()
    }

    /// Sets the marker kind only; id and thread keep their current values.
    pub fn set_marker(&mut self, marker: Marker) {
        self.marker = marker;
    }

    /// Sets kind, id and thread together.
    pub fn set_marker_full(
        &mut self,
        marker: Marker,
        id: impl Into<String>,
        thread: impl Into<String>,
    ) {
        self.marker = marker;
        self.marked_id = id.into();
        self.marked_thread = thread.into();
    }

    pub fn has_hint(&self, hint: Hint) -> bool {
        self.hints.contains(&hint)
    }

    pub fn add_hint(&mut self, hint: Hint) {
        if !self.has_hint(hint) {
            self.hints.push(hint);
        }
    }

    pub fn remove_hint(&mut self, hint: Hint) {
        self.hints.retain(|h| *h != hint);
    }

    /// Embeds a forwarded message by value.
    pub fn set_forwarded(&mut self, message: Message) {
        self.forwarded = Some(Box::new(message));
    }

    /// Embeds an archive-result message by value.
    pub fn set_archived(&mut self, message: Message) {
        self.archived = Some(Box::new(message));
    }

    /// Embeds a carbon-copied message by value.
    pub fn set_carbon(&mut self, message: Message) {
        self.carbon = Some(Box::new(message));
    }
}
