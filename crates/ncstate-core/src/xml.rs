// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XML response normaliser.
//
// Campus services answer in XML (SOAP envelopes, the `format=xml` variants of
// the query APIs). Callers want the same plain map they get from JSON, so the
// document is parsed into a small element tree and then flattened:
//
//   - an element without attributes or child elements becomes its trimmed text;
//   - anything else becomes an object with `@attributes`, one key per child
//     element name (repeated names collapse into an array), and `@text` for
//     non-empty text that sits beside attributes or children.
//
// The document root name becomes the single top-level key.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{NcstateError, Result};

/// Elements nested deeper than this flatten to `null`.
pub const MAX_DEPTH: usize = 25;

/// Key holding an element's attributes in the flattened map.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Key holding text that sits beside attributes or children.
pub const TEXT_KEY: &str = "@text";

/// A parsed XML element with namespace prefixes removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first search for a descendant (or self) with the given name.
    #[cfg(test)]
    fn find(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Trimmed text content of this element.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse an XML document into its root element.
///
/// Elements below the flatten depth limit are checked for well-formedness
/// but not kept, so the tree never nests deeper than `MAX_DEPTH + 1`.
/// Text is kept verbatim; `XmlElement::text()` trims it.
pub fn parse(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    // Open elements currently being skipped below the depth limit.
    let mut skipped = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| NcstateError::Xml(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(_) if skipped > 0 || stack.len() > MAX_DEPTH + 1 => skipped += 1,
            Event::Empty(_) if skipped > 0 || stack.len() > MAX_DEPTH + 1 => {}
            Event::End(_) if skipped > 0 => skipped -= 1,
            Event::Text(_) | Event::CData(_) if skipped > 0 => {}
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| NcstateError::Xml("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    let value = text.unescape().map_err(|e| NcstateError::Xml(e.to_string()))?;
                    current.text.push_str(&value);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(NcstateError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| NcstateError::Xml("document has no root element".into()))
}

/// Parse and flatten a document into `{ <root name>: <root value> }`.
pub fn flatten_document(xml: &str) -> Result<Value> {
    let root = parse(xml)?;
    debug!(root = %root.name, "flattening XML document");
    Ok(flatten_root(&root))
}

/// Flatten an element, wrapping it under its own name.
pub fn flatten_root(element: &XmlElement) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(element.name.clone(), flatten(element));
    Value::Object(wrapper)
}

/// Flatten a single element (without the name wrapper).
pub fn flatten(element: &XmlElement) -> Value {
    flatten_at(element, 0)
}

fn flatten_at(element: &XmlElement, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::Null;
    }

    if element.attributes.is_empty() && element.children.is_empty() {
        return Value::String(element.text().to_owned());
    }

    let mut map = Map::new();

    if !element.attributes.is_empty() {
        let attributes: Map<String, Value> = element
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.trim().to_owned())))
            .collect();
        map.insert(ATTRIBUTES_KEY.into(), Value::Object(attributes));
    }

    if !element.text().is_empty() {
        map.insert(TEXT_KEY.into(), Value::String(element.text().to_owned()));
    }

    for child in &element.children {
        let value = flatten_at(child, depth + 1);
        match map.get_mut(&child.name) {
            None => {
                map.insert(child.name.clone(), value);
            }
            // Flattened elements are never arrays, so an array here already
            // holds earlier siblings of the same name.
            Some(Value::Array(siblings)) => siblings.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }

    Value::Object(map)
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| NcstateError::Xml(e.to_string()))?;
        let raw_key = attr.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| NcstateError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(NcstateError::Xml("multiple root elements".into())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_key_is_root_element_name() {
        let flat = flatten_document(r#"<menu version="2"><item>Grits</item></menu>"#)
            .expect("flatten");
        assert_eq!(
            flat,
            json!({
                "menu": {
                    "@attributes": { "version": "2" },
                    "item": "Grits"
                }
            })
        );
    }

    #[test]
    fn repeated_children_become_array() {
        let flat = flatten_document("<list><ouc>1</ouc><ouc>2</ouc><ouc>3</ouc></list>")
            .expect("flatten");
        assert_eq!(flat, json!({ "list": { "ouc": ["1", "2", "3"] } }));
    }

    #[test]
    fn empty_element_is_empty_string() {
        let flat = flatten_document("<r><a/><b>  </b></r>").expect("flatten");
        assert_eq!(flat, json!({ "r": { "a": "", "b": "" } }));
    }

    #[test]
    fn text_beside_attributes_is_kept() {
        let flat = flatten_document(r#"<r><price unit="usd"> 4.50 </price></r>"#).expect("flatten");
        assert_eq!(
            flat["r"]["price"],
            json!({ "@attributes": { "unit": "usd" }, "@text": "4.50" })
        );
    }

    #[test]
    fn namespaces_are_stripped() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
            <soap:Body><ns:get-entryResponse xmlns:ns="urn:calls"><ns:status>Open</ns:status></ns:get-entryResponse></soap:Body>
        </soap:Envelope>"#;
        let root = parse(xml).expect("parse");
        assert_eq!(root.name, "Envelope");
        assert!(root.attributes.is_empty());
        let response = root.find("get-entryResponse").expect("response");
        assert!(root.find("Header").is_none());
        assert_eq!(response.child("status").map(XmlElement::text), Some("Open"));
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let flat = flatten_document("<r><a>Fish &amp; Chips</a><b><![CDATA[<raw>]]></b></r>")
            .expect("flatten");
        assert_eq!(flat["r"]["a"], "Fish & Chips");
        assert_eq!(flat["r"]["b"], "<raw>");
    }

    #[test]
    fn depth_guard_yields_null() {
        let depth = MAX_DEPTH + 3;
        let mut xml = String::new();
        for i in 0..depth {
            xml.push_str(&format!("<l{i}>"));
        }
        xml.push_str("<leaf>deep</leaf>");
        for i in (0..depth).rev() {
            xml.push_str(&format!("</l{i}>"));
        }

        let flat = flatten_document(&xml).expect("flatten");
        let mut cursor = &flat["l0"];
        for i in 1..=MAX_DEPTH {
            cursor = &cursor[format!("l{i}")];
        }
        assert_eq!(cursor[format!("l{}", MAX_DEPTH + 1)], Value::Null);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(parse("<a><b></a>"), Err(NcstateError::Xml(_))));
        assert!(matches!(parse("<a>"), Err(NcstateError::Xml(_))));
        assert!(matches!(parse("just text"), Err(NcstateError::Xml(_))));
    }

    #[test]
    fn mixed_content_keeps_inner_spaces() {
        let flat = flatten_document(r#"<a x="1">Fish <b>and</b> Chips</a>"#).expect("flatten");
        assert_eq!(flat["a"]["@text"], "Fish  Chips");
        assert_eq!(flat["a"]["b"], "and");

        let flat = flatten_document("<r>\n  <name> Talley  Student Union </name>\n</r>")
            .expect("flatten");
        assert_eq!(flat, json!({ "r": { "name": "Talley  Student Union" } }));
    }

    #[test]
    fn very_deep_documents_are_bounded() {
        let depth = 200_000;
        let xml = format!("{}deep{}", "<a>".repeat(depth), "</a>".repeat(depth));

        let root = parse(&xml).expect("parse");
        let mut levels = 0;
        let mut cursor = &root;
        while let Some(child) = cursor.children.first() {
            cursor = child;
            levels += 1;
        }
        assert_eq!(levels, MAX_DEPTH + 1);

        let flat = flatten_document(&xml).expect("flatten");
        let mut value = &flat["a"];
        for _ in 0..MAX_DEPTH {
            value = &value["a"];
        }
        assert_eq!(value["a"], Value::Null);
    }

    #[test]
    fn skipped_elements_are_still_checked() {
        let depth = MAX_DEPTH + 10;
        let xml = format!("{}<x></y>{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(matches!(parse(&xml), Err(NcstateError::Xml(_))));
    }
}
