use crate::xml::error::{Result, XmlError};
use crate::xml::{Attrs, Element, XmlChild};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses a single XML document into an owned element tree.
///
/// Attribute order is preserved. Whitespace-only text between elements is
/// dropped; all other character data and CDATA is kept verbatim.
pub fn parse(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::TrailingContent);
                }
                stack.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(XmlError::UnexpectedEnd)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() {
                        parent.children.push(XmlChild::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(cdata) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    parent.children.push(XmlChild::Text(text));
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Eof);
    }
    root.ok_or(XmlError::NoRoot)
}

fn attach(element: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlChild::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(XmlError::TrailingContent);
    }
    Ok(())
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Attrs::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push(key, value);
    }
    Ok(Element {
        tag,
        attrs,
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_with_attribute_order() {
        let el = parse(
            "<message to=\"b@example.org\" from=\"a@example.org\" type=\"chat\">\
             <body>hi</body></message>",
        )
        .expect("well-formed");
        assert_eq!(el.tag, "message");
        let keys: Vec<_> = el.attrs.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["to", "from", "type"]);
        assert_eq!(el.first_child("body").map(|b| b.text()), Some("hi".into()));
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let el = parse("<body>a &lt; b &amp; c</body>").expect("well-formed");
        assert_eq!(el.text(), "a < b & c");
    }

    #[test]
    fn test_parse_drops_interelement_whitespace() {
        let el = parse("<message>\n  <body>hi</body>\n</message>").expect("well-formed");
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_parse_keeps_mixed_content() {
        let el = parse("<p>hello <b>bold</b> tail</p>").expect("well-formed");
        assert_eq!(el.children.len(), 3);
        assert_eq!(el.text(), "hello  tail");
    }

    #[test]
    fn test_parse_rejects_empty_and_trailing() {
        assert!(matches!(parse(""), Err(XmlError::NoRoot)));
        assert!(matches!(
            parse("<a/><b/>"),
            Err(XmlError::TrailingContent)
        ));
    }

    #[test]
    fn test_parse_rejects_unclosed_element() {
        assert!(parse("<message><body>hi</body>").is_err());
    }
}
