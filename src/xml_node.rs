// Loosely-typed XML tree for Goodreads responses
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::error::ParseError;

/// One element of a parsed response.
///
/// Children keep document order. Lookups by name return the first match;
/// use [`XmlNode::children_named`] for repeated elements such as `<work>`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
    // alias -> index into `children`
    #[serde(skip)]
    aliases: Vec<(String, usize)>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Character data exactly as it appears in the document, surrounding
    /// whitespace included.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.index_of(name).map(|index| &self.children[index])
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &XmlNode)> {
        self.children.iter().map(|child| (child.name(), child))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the named child, if present.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlNode::text)
    }

    /// Detaches the named child, keeping any aliases that point at it.
    pub fn take_child(mut self, name: &str) -> Option<XmlNode> {
        let index = self.index_of(name)?;
        Some(self.children.swap_remove(index))
    }

    /// Makes the child at `index` reachable under `alias` as well.
    pub(crate) fn add_alias(&mut self, alias: String, index: usize) {
        if index < self.children.len() && self.index_of(&alias).is_none() {
            self.aliases.push((alias, index));
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.name == name)
            .or_else(|| {
                self.aliases
                    .iter()
                    .find(|(alias, _)| alias == name)
                    .map(|(_, index)| *index)
            })
    }

    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

pub(crate) fn parse(xml: &str) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(element(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let node = element(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                // quick-xml has already checked that the end tag matches
                let node = stack
                    .pop()
                    .ok_or_else(|| ParseError::XmlParseError("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .decode()
                    .map_err(|e| ParseError::XmlParseError(e.to_string()))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => (),
                    None => return Err(content_outside_root()),
                }
            }
            Ok(Event::CData(e)) => {
                let current = stack.last_mut().ok_or_else(content_outside_root)?;
                current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::GeneralRef(e)) => {
                let current = stack.last_mut().ok_or_else(content_outside_root)?;
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|e| ParseError::XmlParseError(e.to_string()))?
                {
                    current.text.push(ch);
                } else {
                    let name = e
                        .decode()
                        .map_err(|e| ParseError::XmlParseError(e.to_string()))?;
                    match resolve_predefined_entity(&name) {
                        Some(value) => current.text.push_str(value),
                        None => {
                            return Err(ParseError::XmlParseError(format!(
                                "unknown entity &{};",
                                name
                            )))
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::XmlParseError(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => (),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::UnclosedElement(open.name));
    }

    root.ok_or(ParseError::EmptyDocument)
}

fn element(start: &BytesStart<'_>) -> Result<XmlNode, ParseError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::XmlParseError(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::XmlParseError(e.to_string()))?;
        node.attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value.into_owned(),
        ));
    }

    Ok(node)
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => {
            return Err(ParseError::XmlParseError(format!(
                "multiple root elements: <{}>",
                node.name
            )))
        }
        None => *root = Some(node),
    }
    Ok(())
}

fn content_outside_root() -> ParseError {
    ParseError::XmlParseError("content outside the root element".to_string())
}
