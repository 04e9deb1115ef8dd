//! Generic XML decoding.
//!
//! GPX and TCX are both read into the same loose tree of [`Value`]s before any
//! format specific code looks at them:
//!
//! - an element with children or attributes becomes an object keyed by child
//!   element name,
//! - attributes are grouped in an object under the [`ATTRIBUTES`] key,
//! - an element holding only text becomes a string (empty for `<a/>`),
//! - text next to children or attributes is kept under [`TEXT`],
//! - a child element that occurs more than once becomes an array, in document
//!   order. A single occurrence is *not* wrapped, see [`one_or_many`].

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};
use thiserror::Error;

pub const ATTRIBUTES: &str = "$";
pub const TEXT: &str = "#text";

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("{0}")]
    Attribute(#[from] AttrError),

    #[error("unexpected end of document, <{0}> is never closed")]
    Unclosed(String),
}

/// Decodes a whole document. The returned object has one key per root element.
pub fn decode(text: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(text);
    let mut stack = vec![Element::root()];

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                close(&mut stack, element);
            }
            Event::End(_) => {
                // quick-xml already rejects mismatched end tags
                if stack.len() > 1 {
                    if let Some(element) = stack.pop() {
                        close(&mut stack, element);
                    }
                }
            }
            Event::Text(text) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {} // declarations, comments, processing instructions
        }
    }

    if stack.len() > 1 {
        let name = stack.pop().map(|element| element.name).unwrap_or_default();
        return Err(XmlError::Unclosed(name));
    }

    Ok(stack
        .pop()
        .map(|root| Value::Object(root.children))
        .unwrap_or(Value::Null))
}

/// Views a field that may hold one item or an array of items as a slice.
///
/// An absent field is an empty slice, a lone object a slice of one.
pub fn one_or_many(value: Option<&Value>) -> &[Value] {
    match value {
        None => &[],
        Some(Value::Array(items)) => items,
        Some(item) => std::slice::from_ref(item),
    }
}

/// Text content of an element, whether or not it also carries attributes.
pub fn text(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(text) => Some(text),
        Value::Object(map) => map.get(TEXT).and_then(Value::as_str),
        _ => None,
    }
}

pub fn attribute<'a>(node: &'a Value, name: &str) -> Option<&'a str> {
    node.get(ATTRIBUTES)?.get(name)?.as_str()
}

struct Element {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn root() -> Self {
        Element {
            name: String::new(),
            children: Map::new(),
            text: String::new(),
        }
    }

    fn open(start: &BytesStart) -> Result<Self, XmlError> {
        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.insert(key, Value::String(value));
        }

        let mut children = Map::new();
        if !attributes.is_empty() {
            children.insert(ATTRIBUTES.to_string(), Value::Object(attributes));
        }

        Ok(Element {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            children,
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();
        if self.children.is_empty() {
            return Value::String(text.to_string());
        }

        let mut children = self.children;
        if !text.is_empty() {
            children.insert(TEXT.to_string(), Value::String(text.to_string()));
        }
        Value::Object(children)
    }
}

/// Attaches a finished element to its parent, turning repeats into an array.
fn close(stack: &mut [Element], element: Element) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    let name = element.name.clone();
    let value = element.into_value();

    match parent.children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.children.insert(name, value);
        }
    }
}
