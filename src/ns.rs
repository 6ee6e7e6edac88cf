//! Protocol namespace URIs.
//!
//! Every string here must match the registered XEP namespace exactly; a
//! mismatched URI makes the decoder treat the element as absent or as an
//! opaque extension.

/// XEP-0085: Chat State Notifications
pub const CHAT_STATES: &str = "http://jabber.org/protocol/chatstates";
/// XEP-0071: XHTML-IM
pub const XHTML_IM: &str = "http://jabber.org/protocol/xhtml-im";
/// XHTML itself, used for the inner `<body>` of an XHTML-IM block
pub const XHTML: &str = "http://www.w3.org/1999/xhtml";
/// XEP-0184: Message Delivery Receipts
pub const RECEIPTS: &str = "urn:xmpp:receipts";
/// XEP-0203: Delayed Delivery
pub const DELAY: &str = "urn:xmpp:delay";
/// XEP-0091: Legacy Delayed Delivery
pub const LEGACY_DELAY: &str = "jabber:x:delay";
/// XEP-0297: Stanza Forwarding
pub const FORWARDING: &str = "urn:xmpp:forward:0";
/// XEP-0313: Message Archive Management
pub const ARCHIVE: &str = "urn:xmpp:mam:tmp";
/// XEP-0280: Message Carbons
pub const CARBONS: &str = "urn:xmpp:carbons:2";
/// XEP-0249: Direct MUC Invitations
pub const CONFERENCE: &str = "jabber:x:conference";
/// XEP-0045: Multi-User Chat, mediated invitations
pub const MUC_USER: &str = "http://jabber.org/protocol/muc#user";
/// XEP-0224: Attention
pub const ATTENTION: &str = "urn:xmpp:attention:0";
/// XEP-0334: Message Processing Hints
pub const HINTS: &str = "urn:xmpp:hints";
/// XEP-0333: Chat Markers
pub const CHAT_MARKERS: &str = "urn:xmpp:chat-markers:0";
/// XEP-0308: Last Message Correction
pub const CORRECTION: &str = "urn:xmpp:message-correct:0";
/// RFC 6120 stanza error conditions
pub const STANZAS: &str = "urn:ietf:params:xml:ns:xmpp-stanzas";
