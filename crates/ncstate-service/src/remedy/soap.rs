// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SOAP 1.1 envelope construction and response decoding for Remedy.
//
// Envelope layout:
//   Header → AuthenticationInfo { userName, password }
//   Body   → <operation> { one element per argument, in order }

use std::io::Cursor;

use ncstate_core::error::{NcstateError, Result};
use ncstate_core::xml;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;

use super::fields::SoapArgs;

pub const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Target namespace of a Remedy form endpoint.
pub fn namespace(endpoint: &str) -> String {
    format!("urn:{endpoint}")
}

/// `SOAPAction` header value.
pub fn action(endpoint: &str, operation: &str) -> String {
    format!("urn:{endpoint}/{operation}")
}

/// Build the request envelope.
pub fn build_envelope(
    endpoint: &str,
    operation: &str,
    username: &str,
    password: &str,
    args: &SoapArgs,
) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let ns = namespace(endpoint);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(
        &mut writer,
        Event::Start(
            BytesStart::new("soapenv:Envelope")
                .with_attributes([("xmlns:soapenv", ENVELOPE_NS), ("xmlns:ns", ns.as_str())]),
        ),
    )?;

    emit(&mut writer, Event::Start(BytesStart::new("soapenv:Header")))?;
    emit(&mut writer, Event::Start(BytesStart::new("ns:AuthenticationInfo")))?;
    text_element(&mut writer, "ns:userName", Some(username))?;
    text_element(&mut writer, "ns:password", Some(password))?;
    emit(&mut writer, Event::End(BytesEnd::new("ns:AuthenticationInfo")))?;
    emit(&mut writer, Event::End(BytesEnd::new("soapenv:Header")))?;

    let op = format!("ns:{operation}");
    emit(&mut writer, Event::Start(BytesStart::new("soapenv:Body")))?;
    emit(&mut writer, Event::Start(BytesStart::new(op.as_str())))?;
    for (name, value) in args {
        let tag = format!("ns:{name}");
        text_element(&mut writer, &tag, value.as_deref())?;
    }
    emit(&mut writer, Event::End(BytesEnd::new(op.as_str())))?;
    emit(&mut writer, Event::End(BytesEnd::new("soapenv:Body")))?;
    emit(&mut writer, Event::End(BytesEnd::new("soapenv:Envelope")))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| NcstateError::Soap(format!("envelope is not UTF-8: {e}")))
}

/// Decode a response envelope: the first element of the body, flattened.
/// A `Fault` becomes [`NcstateError::Soap`] carrying its `faultstring`.
pub fn parse_response(body: &str) -> Result<Value> {
    let envelope = xml::parse(body)?;
    let soap_body = envelope
        .child("Body")
        .ok_or_else(|| NcstateError::Soap("response has no SOAP Body".into()))?;

    let Some(first) = soap_body.children.first() else {
        return Ok(Value::Null);
    };
    if first.name == "Fault" {
        let message = first
            .child("faultstring")
            .map(|f| f.text().to_owned())
            .unwrap_or_else(|| "unknown fault".into());
        return Err(NcstateError::Soap(message));
    }
    Ok(xml::flatten(first))
}

fn text_element(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, value: Option<&str>) -> Result<()> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => {
            emit(writer, Event::Start(BytesStart::new(tag)))?;
            emit(writer, Event::Text(BytesText::new(v)))?;
            emit(writer, Event::End(BytesEnd::new(tag)))
        }
        None => emit(writer, Event::Empty(BytesStart::new(tag))),
    }
}

fn emit(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| NcstateError::Soap(format!("cannot write envelope: {e}")))
}
