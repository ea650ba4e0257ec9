use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::InvalidGrammar;

/// A fully materialized XML element. The loader reads the whole document
/// into a small element tree first and desugars from that, so the event
/// plumbing stays in one place.
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn require_attribute(&self, name: &str) -> Result<&str, InvalidGrammar> {
        self.attribute(name).ok_or_else(|| InvalidGrammar::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    pub fn children_named<'e>(&'e self, name: &'e str) -> impl Iterator<Item = &'e Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// The element's text content with surrounding whitespace removed.
    pub fn text_trim(&self) -> &str {
        self.text.trim()
    }
}

/// Parses a document into its root element.
pub(crate) fn parse_document(input: &str) -> Result<Element, InvalidGrammar> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                open.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                // The reader checks end-name balance, so there is always a
                // matching open element.
                let element = open.pop().expect("reader validated end tags");
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if let Some(parent) = open.last_mut() {
                    parent.text.push_str(&value);
                }
            }
            Event::Eof => break,
            // Comments, processing instructions, declarations.
            _ => {}
        }
    }

    root.ok_or(InvalidGrammar::MissingRoot)
}

fn element_from(start: &BytesStart) -> Result<Element, InvalidGrammar> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = BTreeMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), InvalidGrammar> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(InvalidGrammar::UnexpectedElement {
            element: element.name,
        }),
    }
}
