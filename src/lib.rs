//! XMPP message-stanza codec.
//!
//! Parses a `<message>` element tree into a strongly-typed [`Message`]
//! record and serializes it back to wire XML in a fixed element order.
//! Each supported XEP maps to an independently-optional field; anything the
//! codec does not recognize round-trips untouched through the envelope's
//! opaque extension list, so stanzas from newer protocol revisions survive
//! a decode/encode cycle.

pub mod message;
pub mod ns;
pub mod stanza;
pub mod xml;

pub use message::{ChatState, Hint, Marker, Message, MessageType, MucInvitation, StampFormat};
pub use stanza::{Stanza, StanzaError};
pub use xml::{Element, ElementBuilder, XmlChild, XmlError, XmlWriter};
