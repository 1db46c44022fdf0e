//! XML to raw tree conversion

use crate::errors::{XmlError, XmlResult};
use adf_ir::{ATTRIBUTE_PREFIX, Document, SourceFormat, SourceInfo, TEXT_KEY};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// An element whose end tag has not been seen yet
struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> XmlResult<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::malformed(position, e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref());
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::malformed(position, e.to_string()))?;
            fields.insert(
                format!("{ATTRIBUTE_PREFIX}{key}"),
                Value::String(value.into_owned()),
            );
        }

        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    /// Element value: null when empty, the bare text when there are no
    /// attributes or children, otherwise a mapping
    fn close(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.fields.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut fields = self.fields;
            if !text.is_empty() {
                fields.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(fields)
        };
        (self.name, value)
    }
}

/// Insert a child element, turning repeated siblings into a sequence
fn attach(fields: &mut Map<String, Value>, name: String, value: Value) {
    match fields.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

/// Convert an XML document into a raw tree
///
/// The root element becomes the single top-level key. Attributes are keyed
/// with an `@` prefix, mixed text content goes under `#text`, and sibling
/// elements sharing a name collapse into a sequence.
///
/// # Errors
///
/// Returns [`XmlError::Malformed`] when the document is not well-formed or has
/// no root element.
pub fn xml_to_tree(xml: &str) -> XmlResult<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| XmlError::malformed(reader.error_position(), e.to_string()))?;

        match event {
            Event::Start(ref e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::malformed(position, "multiple root elements"));
                }
                stack.push(Frame::open(e, position)?);
            }
            Event::Empty(ref e) => {
                let (name, value) = Frame::open(e, position)?.close();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.fields, name, value),
                    None if root.is_some() => {
                        return Err(XmlError::malformed(position, "multiple root elements"));
                    }
                    None => root = Some((name, value)),
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(XmlError::malformed(position, "unexpected end tag"));
                };
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(ref e) => {
                if let Some(frame) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| XmlError::malformed(position, err.to_string()))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::malformed(
            reader.buffer_position(),
            format!("unclosed element <{}>", open.name),
        ));
    }

    let (name, value) = root.ok_or_else(|| XmlError::malformed(0, "no root element"))?;
    trace!("Converted XML with root <{name}>");

    let mut tree = Map::new();
    tree.insert(name, value);
    Ok(Value::Object(tree))
}

/// Read and convert an XML file
///
/// # Errors
///
/// Returns [`XmlError::NotFound`] for a missing file, [`XmlError::Malformed`]
/// for invalid XML or non-UTF-8 content and [`XmlError::Io`] for other read failures.
pub fn load_document(path: &Path) -> XmlResult<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| XmlError::from_io(path, &e))?;
    let tree = xml_to_tree(&content)?;
    debug!("Loaded XML document from {}", path.display());

    Ok(Document::new(tree).with_source(
        SourceInfo::new(path.display().to_string(), SourceFormat::Xml).with_context("quick-xml"),
    ))
}

/// Output path for a converted file: the `.xml` suffix replaced by `.json`
#[must_use]
pub fn json_path_for(path: &Path) -> PathBuf {
    let is_xml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if is_xml {
        path.with_extension("json")
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    }
}
