//! In-memory XML document: an ordered element tree read and written with quick-xml.
//!
//! Text follows ElementTree conventions: an element's *text* is the character
//! data before its first child element. Whitespace is kept verbatim so a
//! document written back looks like the one that was read.

use crate::error::Error;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// An XML element with its attributes (in source order) and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of leading children that make up the element's text segment.
    fn leading_len(&self) -> usize {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(_)))
            .unwrap_or(self.children.len())
    }

    /// Character data before the first child element (comments skipped).
    pub fn text(&self) -> String {
        self.children[..self.leading_len()]
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace the element's text. Child elements, their tails and comments stay.
    pub fn set_text(&mut self, text: &str) {
        let leading = self.leading_len();
        let mut index = 0;
        self.children.retain(|node| {
            let keep = index >= leading || !matches!(node, Node::Text(_) | Node::CData(_));
            index += 1;
            keep
        });
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text.to_string()));
        }
    }

    /// Direct child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First direct child element with the given tag.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    /// All descendants (not including `self`) in document order.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(self, &mut found);
        found
    }

    /// Visit every descendant mutably, parents before their children.
    pub fn for_each_descendant_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        for node in &mut self.children {
            if let Node::Element(element) = node {
                f(element);
                element.for_each_descendant_mut(f);
            }
        }
    }
}

fn collect_descendants<'a>(element: &'a Element, found: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        found.push(child);
        collect_descendants(child, found);
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
    /// Whether the source started with an `<?xml ...?>` declaration.
    pub has_declaration: bool,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            has_declaration: false,
        }
    }

    /// Parse a document from a string. `origin` names the input in errors.
    pub fn parse(xml: &str, origin: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut has_declaration = false;

        let parse_error = |message: String| Error::Parse {
            origin: origin.to_string(),
            message,
        };

        loop {
            let event = reader.read_event().map_err(|e| {
                parse_error(format!("{} (at byte {})", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(parse_error("more than one root element".to_string()));
                    }
                    stack.push(element_from_start(&start).map_err(parse_error)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start).map_err(parse_error)?;
                    attach(&mut stack, &mut root, element).map_err(parse_error)?;
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        parse_error(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(end.name().as_ref())
                        ))
                    })?;
                    attach(&mut stack, &mut root, element).map_err(parse_error)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| parse_error(e.to_string()))?
                        .into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(parse_error(format!(
                                "text outside the root element: {:?}",
                                text.trim()
                            )))
                        }
                    }
                }
                Event::CData(data) => {
                    let data = utf8(data.into_inner()).map_err(parse_error)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(data)),
                        None => {
                            return Err(parse_error("CDATA outside the root element".to_string()))
                        }
                    }
                }
                Event::Comment(comment) => {
                    let comment = utf8(comment.into_inner()).map_err(parse_error)?;
                    // Comments outside the root element are dropped
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Comment(comment));
                    }
                }
                Event::Decl(_) => has_declaration = true,
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(parse_error(format!("unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| parse_error("no root element".to_string()))?;

        Ok(Self {
            root,
            has_declaration,
        })
    }

    /// Read and parse a document from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => Error::Parse {
                origin: path.display().to_string(),
                message: "input is not valid UTF-8".to_string(),
            },
            _ => Error::io(path, e),
        })?;
        debug!("Read {} bytes from {}", xml.len(), path.display());
        Self::parse(&xml, &path.display().to_string())
    }

    /// Serialize the document as UTF-8 XML.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut writer = Writer::new(Vec::new());
        if self.has_declaration {
            emit(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
            emit(&mut writer, Event::Text(BytesText::new("\n")))?;
        }
        write_element(&mut writer, &self.root)?;
        emit(&mut writer, Event::Text(BytesText::new("\n")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Serialize and write the document, creating parent directories.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let xml = self.to_xml_string()?;
        crate::table::ensure_parent_dir(path)?;
        std::fs::write(path, xml).map_err(|e| Error::io(path, e))
    }
}

fn utf8(bytes: Cow<'_, [u8]>) -> Result<String, String> {
    String::from_utf8(bytes.into_owned()).map_err(|e| format!("invalid UTF-8: {}", e))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = utf8(Cow::Borrowed(start.name().as_ref()))?;
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = utf8(Cow::Borrowed(attribute.key.as_ref()))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err("more than one root element".to_string()),
    }
    Ok(())
}

/// Attribute values also encode `\n`, `\r` and `\t`, which a reader would
/// otherwise normalize to spaces.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// A literal `\r` in text would come back as `\n`.
fn escape_text(text: &str) -> String {
    partial_escape(text).replace('\r', "&#13;")
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), Error> {
    writer
        .write_event(event)
        .map_err(|e| Error::Serialize(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        let value = escape_attribute(value);
        start.push_attribute(Attribute::from((key.as_bytes(), value.as_bytes())));
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => {
                let text = escape_text(text);
                emit(writer, Event::Text(BytesText::from_escaped(text.as_str())))?
            }
            Node::CData(data) => emit(writer, Event::CData(BytesCData::new(data.as_str())))?,
            Node::Comment(comment) => {
                emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}
