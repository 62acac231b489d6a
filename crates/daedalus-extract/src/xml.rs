//! XML body decoding.
//!
//! Bodies are decoded with the `quick-xml` serde deserializer. It does not
//! report positions, so for malformed documents the body is re-scanned with
//! the pull reader to find the line where reading failed.
//!
//! To decode onto an existing value the target is serialised to XML, both
//! documents are read into element trees, the body's tree is merged over the
//! target's, and the merged document is deserialised.

use daedalus_core::{DecodeError, DecodeErrorKind, DocumentFormat};
use quick_xml::de::DeError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::json::split_type_mismatch;

/// Decodes an XML document into a fresh `T`. The root element name is not
/// checked.
pub fn decode_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let text = utf8(body)?;
    deserialize(text, body)
}

/// Decodes an XML document onto the current value of `target`.
///
/// Child elements present in the body replace the target's elements of the
/// same name; a single nested element on both sides is merged recursively.
/// Elements absent from the body keep the target's values. On failure
/// `target` is left unchanged.
pub fn decode_xml_into<T>(body: &[u8], target: &mut T) -> Result<(), DecodeError>
where
    T: Serialize + DeserializeOwned,
{
    let text = utf8(body)?;
    let document = Element::parse(text).map_err(|err| translate(err, body))?;

    let mut base = target_tree(target)?;
    base.merge(document);
    let merged = base.to_xml().map_err(other)?;

    *target = deserialize(&merged, body)?;
    Ok(())
}

fn utf8(body: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(body).map_err(|err| {
        DecodeError::new(
            DocumentFormat::Xml,
            DecodeErrorKind::Syntax {
                offset: Some(err.valid_up_to()),
                line: Some(line_at(body, err.valid_up_to())),
                message: format!("invalid UTF-8: {err}"),
            },
        )
    })
}

fn deserialize<T: DeserializeOwned>(text: &str, body: &[u8]) -> Result<T, DecodeError> {
    let mut de = quick_xml::de::Deserializer::from_str(text);
    serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        let field = (path != ".").then_some(path);
        with_field(translate(err.into_inner(), body), field)
    })
}

// `None` fields serialise as empty elements, which read back as present
// values. The JSON form of the target says which fields are null.
fn target_tree<T: Serialize>(target: &T) -> Result<Element, DecodeError> {
    let xml = quick_xml::se::to_string(target).map_err(other)?;
    let mut tree = Element::parse(&xml).map_err(other)?;
    let shape = serde_json::to_value(target).map_err(other)?;
    tree.drop_nulls(&shape);
    Ok(tree)
}

fn other(err: impl std::fmt::Display) -> DecodeError {
    DecodeError::new(
        DocumentFormat::Xml,
        DecodeErrorKind::Other {
            message: format!("cannot represent target as XML: {err}"),
        },
    )
}

fn with_field(err: DecodeError, field: Option<String>) -> DecodeError {
    match err.kind() {
        DecodeErrorKind::TypeMismatch {
            expected,
            actual,
            offset,
            ..
        } => DecodeError::new(
            DocumentFormat::Xml,
            DecodeErrorKind::TypeMismatch {
                expected: expected.clone(),
                actual: actual.clone(),
                field,
                offset: *offset,
            },
        ),
        _ => err,
    }
}

fn translate(err: DeError, body: &[u8]) -> DecodeError {
    let kind = match err {
        DeError::InvalidXml(inner) => {
            let offset = scan_error_position(body).unwrap_or(body.len());
            DecodeErrorKind::Syntax {
                offset: Some(offset),
                line: Some(line_at(body, offset)),
                message: inner.to_string(),
            }
        }
        DeError::UnexpectedEof => DecodeErrorKind::Syntax {
            offset: Some(body.len()),
            line: Some(line_at(body, body.len())),
            message: err.to_string(),
        },
        DeError::Custom(message) => match split_type_mismatch(&message) {
            Some((actual, expected)) => DecodeErrorKind::TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
                field: None,
                offset: None,
            },
            None => DecodeErrorKind::Other { message },
        },
        other => DecodeErrorKind::Other {
            message: other.to_string(),
        },
    };

    DecodeError::new(DocumentFormat::Xml, kind)
}

/// Replays the document through the pull reader and returns the byte
/// position where it first fails.
fn scan_error_position(body: &[u8]) -> Option<usize> {
    let mut reader = Reader::from_reader(body);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => return None,
            Ok(_) => buf.clear(),
            Err(_) => return usize::try_from(reader.buffer_position()).ok(),
        }
    }
}

fn line_at(body: &[u8], offset: usize) -> usize {
    let end = offset.min(body.len());
    1 + body[..end].iter().filter(|&&b| b == b'\n').count()
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

/// A parsed element: name, attributes in document order, and content.
#[derive(Debug, Clone, PartialEq, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn new(start: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            attributes.push((key, attr.unescape_value()?.into_owned()));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        })
    }

    /// Reads the root element of a document.
    fn parse(text: &str) -> Result<Self, DeError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::new(&start)?),
                Event::Empty(start) => {
                    let element = Self::new(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(DeError::UnexpectedEof)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text.unescape()?.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::Eof => return Err(DeError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn has_element_children(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, Node::Element(_)))
    }

    fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.children.iter().filter_map(move |child| match child {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Merges `upper` over `self`, keeping the root name of `self`.
    fn merge(&mut self, mut upper: Self) {
        for (key, value) in std::mem::take(&mut upper.attributes) {
            match self.attributes.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => self.attributes.push((key, value)),
            }
        }

        if !upper.has_element_children() {
            if !upper.children.is_empty() || !self.has_element_children() {
                self.children = upper.children;
            }
            return;
        }

        let mut groups: Vec<(String, Vec<Self>)> = Vec::new();
        for child in upper.children {
            if let Node::Element(element) = child {
                match groups.iter_mut().find(|(name, _)| *name == element.name) {
                    Some((_, group)) => group.push(element),
                    None => groups.push((element.name.clone(), vec![element])),
                }
            }
        }

        for (name, mut group) in groups {
            let nested = group.len() == 1
                && group[0].has_element_children()
                && self.elements_named(&name).count() == 1;
            if nested {
                if let Some(Node::Element(existing)) = self
                    .children
                    .iter_mut()
                    .find(|child| matches!(child, Node::Element(e) if e.name == name))
                {
                    existing.merge(group.remove(0));
                }
                continue;
            }

            let position = self
                .children
                .iter()
                .position(|child| matches!(child, Node::Element(e) if e.name == name))
                .unwrap_or(self.children.len());
            self.children
                .retain(|child| !matches!(child, Node::Element(e) if e.name == name));
            let position = position.min(self.children.len());
            self.children
                .splice(position..position, group.into_iter().map(Node::Element));
        }
    }

    /// Removes child elements whose counterpart in `shape` is null.
    fn drop_nulls(&mut self, shape: &Value) {
        let Value::Object(members) = shape else {
            return;
        };
        self.children.retain(|child| match child {
            Node::Element(element) => !matches!(members.get(&element.name), Some(Value::Null)),
            Node::Text(_) => true,
        });
        for child in &mut self.children {
            if let Node::Element(element) = child {
                if let Some(nested) = members.get(&element.name) {
                    element.drop_nulls(nested);
                }
            }
        }
    }

    fn to_xml(&self) -> std::io::Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> std::io::Result<()> {
        let start = BytesStart::new(self.name.as_str()).with_attributes(
            self.attributes
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );
        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct User {
        name: String,
        age: u32,
    }

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct Address {
        city: String,
        zip: String,
    }

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    struct Account {
        name: String,
        quota: u32,
        #[serde(default)]
        tags: Vec<String>,
        nickname: Option<String>,
        active: Option<bool>,
        address: Address,
    }

    fn account() -> Account {
        Account {
            name: "alice".to_string(),
            quota: 5,
            tags: vec!["a".to_string(), "b".to_string()],
            nickname: Some("al".to_string()),
            active: None,
            address: Address {
                city: "Lyon".to_string(),
                zip: "69001".to_string(),
            },
        }
    }

    #[test]
    fn test_decode_valid_xml() {
        let user: User =
            decode_xml(b"<User><name>Alice</name><age>30</age></User>").unwrap();

        assert_eq!(
            user,
            User {
                name: "Alice".to_string(),
                age: 30,
            }
        );
    }

    #[test]
    fn test_mismatched_tag_reports_line() {
        let body = b"<User>\n  <name>Alice</nam>\n  <age>30</age>\n</User>";
        let err = decode_xml::<User>(body).unwrap_err();

        assert_eq!(err.format(), DocumentFormat::Xml);
        match err.kind() {
            DecodeErrorKind::Syntax { line, .. } => assert_eq!(*line, Some(2)),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_document_is_syntax_error() {
        let err = decode_xml::<User>(b"<User><name>Alice</name>").unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::Syntax { .. }));
    }

    #[test]
    fn test_missing_field_is_not_syntax() {
        let err = decode_xml::<User>(b"<User><name>Alice</name></User>").unwrap_err();
        assert!(!matches!(err.kind(), DecodeErrorKind::Syntax { .. }));
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let err = decode_xml::<User>(b"<User><name>Alice</name><age>old</age></User>").unwrap_err();

        match err.kind() {
            DecodeErrorKind::TypeMismatch {
                expected, field, ..
            } => {
                assert_eq!(expected, "u32");
                assert_eq!(field.as_deref(), Some("age"));
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode_xml::<User>(b"<User>\n<name>\xff</name></User>").unwrap_err();

        match err.kind() {
            DecodeErrorKind::Syntax { offset, line, .. } => {
                assert_eq!(*offset, Some(13));
                assert_eq!(*line, Some(2));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_into_keeps_absent_elements() {
        let mut target = account();
        let body = b"<Account><name>bob</name><address><zip>69002</zip></address></Account>";

        decode_xml_into(body, &mut target).unwrap();

        assert_eq!(target.name, "bob");
        assert_eq!(target.quota, 5);
        assert_eq!(target.tags, vec!["a", "b"]);
        assert_eq!(target.nickname.as_deref(), Some("al"));
        assert_eq!(target.active, None);
        assert_eq!(target.address.city, "Lyon");
        assert_eq!(target.address.zip, "69002");
    }

    #[test]
    fn test_decode_into_replaces_repeated_elements() {
        let mut target = account();
        let body = b"<Account><tags>x</tags><tags>y</tags><tags>z</tags><active>true</active></Account>";

        decode_xml_into(body, &mut target).unwrap();

        assert_eq!(target.tags, vec!["x", "y", "z"]);
        assert_eq!(target.active, Some(true));
        assert_eq!(target.name, "alice");
    }

    #[test]
    fn test_decode_into_failure_leaves_target() {
        let mut target = account();

        let err = decode_xml_into(b"<Account><quota>lots</quota></Account>", &mut target)
            .unwrap_err();

        assert!(matches!(err.kind(), DecodeErrorKind::TypeMismatch { .. }));
        assert_eq!(target, account());
    }

    #[test]
    fn test_decode_into_syntax_error() {
        let mut target = account();
        let body = b"<Account>\n<name>bob</nam>\n</Account>";

        let err = decode_xml_into(body, &mut target).unwrap_err();

        match err.kind() {
            DecodeErrorKind::Syntax { line, .. } => assert_eq!(*line, Some(2)),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_element_merge() {
        let mut lower = Element::parse("<r a=\"1\"><x>1</x><y><p>1</p><q>2</q></y><z>1</z><z>2</z></r>").unwrap();
        let upper = Element::parse("<r b=\"2\"><y><q>3</q></y><z>9</z><w>new</w></r>").unwrap();

        lower.merge(upper);

        assert_eq!(
            lower.to_xml().unwrap(),
            "<r a=\"1\" b=\"2\"><x>1</x><y><p>1</p><q>3</q></y><z>9</z><w>new</w></r>"
        );
    }

    #[test]
    fn test_line_at() {
        assert_eq!(line_at(b"a\nb\nc", 0), 1);
        assert_eq!(line_at(b"a\nb\nc", 2), 2);
        assert_eq!(line_at(b"a\nb\nc", 100), 3);
    }
}
