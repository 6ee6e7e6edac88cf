use crate::ns;
use crate::xml::Element;

/// One entry of the known-child table. An empty namespace means "match the
/// name regardless of namespace"; a non-empty one must match exactly.
pub(crate) struct KnownChild {
    pub name: &'static str,
    pub ns: &'static str,
}

const fn known(name: &'static str) -> KnownChild {
    KnownChild { name, ns: "" }
}

const fn known_in(name: &'static str, ns: &'static str) -> KnownChild {
    KnownChild { name, ns }
}

/// The fixed set of child names this codec consumes through its own feature
/// fields. Generically-named children (body, delay, the chat states) are
/// listed without a namespace so a foreign-namespace twin is still excluded
/// from the opaque extension list; receipt-specific names are excluded only
/// in their own namespace.
pub(crate) const KNOWN_CHILDREN: &[KnownChild] = &[
    known("body"),
    known("subject"),
    known("thread"),
    known("html"),
    known_in("received", ns::RECEIPTS),
    known("request"),
    known("delay"),
    known("attention"),
    known("addresses"),
    // one entry per chat-state name
    known("active"),
    known("inactive"),
    known("gone"),
    known("composing"),
    known("paused"),
];

/// True when the element matches a registry entry, checked against both the
/// qualified (name, namespace) and unqualified (name, "") forms.
pub(crate) fn is_known_child(element: &Element) -> bool {
    let namespace = element.namespace();
    KNOWN_CHILDREN
        .iter()
        .any(|entry| entry.name == element.tag && (entry.ns.is_empty() || entry.ns == namespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::ElementBuilder;

    #[test]
    fn test_unqualified_entries_match_any_namespace() {
        let foreign = ElementBuilder::new("active")
            .attr("xmlns", "urn:example:unrelated")
            .build();
        assert!(is_known_child(&foreign));

        let plain = ElementBuilder::new("body").build();
        assert!(is_known_child(&plain));
    }

    #[test]
    fn test_qualified_entries_require_their_namespace() {
        let receipt = ElementBuilder::new("received")
            .attr("xmlns", ns::RECEIPTS)
            .build();
        assert!(is_known_child(&receipt));

        let marker = ElementBuilder::new("received")
            .attr("xmlns", ns::CHAT_MARKERS)
            .build();
        assert!(!is_known_child(&marker));
    }

    #[test]
    fn test_unknown_names_do_not_match() {
        let custom = ElementBuilder::new("payload")
            .attr("xmlns", "urn:example:0")
            .build();
        assert!(!is_known_child(&custom));
    }
}
