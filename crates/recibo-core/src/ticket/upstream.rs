//! Recognition of upstream extraction responses.
//!
//! The extraction service answers in several JSON shapes. Each shape is
//! matched once here and routed to exactly one pipeline.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::UpstreamError;

use super::parser::FreeTextParser;
use super::structured::{is_pair_object, pairs_from_json, parse_structured_pairs};
use super::{ParsedTicket, TicketParser};

/// Maximum characters of payload kept in an unrecognized-format error.
const PREVIEW_CHARS: usize = 500;

/// Object fields searched, in order, for a bare text payload.
const TEXT_FIELDS: [&str; 3] = ["description", "content", "data"];

/// A recognized upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// `[{"data": [pair, ...]}]`
    PairEnvelope(Vec<Value>),
    /// `[pair, ...]`
    PairArray(Vec<Value>),
    /// `{"<field>": [pair, ...], ...}`
    NestedPairs { field: String, items: Vec<Value> },
    /// A lone `{"clave": ..., "valor": ...}` object.
    SinglePair(Value),
    /// `{"extracted_text": "..."}`
    ExtractedText(String),
    /// `{"responses": [{"fullTextAnnotation": {"text": "..."}}]}`
    VisionResponses(String),
    /// `{"fullTextAnnotation": {"text": "..."}}`
    FullTextAnnotation(String),
    /// `{"text": "..."}`
    Text(String),
    /// `{"description" | "content" | "data": "..."}`
    TextField { field: &'static str, text: String },
}

impl UpstreamPayload {
    /// Recognize the shape of an upstream response.
    pub fn detect(value: &Value) -> Result<Self, UpstreamError> {
        let payload = match value {
            Value::Array(items) => Self::detect_array(items),
            Value::Object(_) => Self::detect_object(value)?,
            _ => None,
        };

        match payload {
            Some(payload) => {
                debug!("Recognized upstream payload as {}", payload.shape());
                Ok(payload)
            }
            None => Err(UpstreamError::UnrecognizedFormat {
                kind: json_kind(value),
                preview: preview(value),
            }),
        }
    }

    fn detect_array(items: &[Value]) -> Option<Self> {
        let first = items.first()?;

        if let Some(data) = first.get("data").and_then(Value::as_array) {
            if data.first().is_some_and(is_pair_object) {
                return Some(Self::PairEnvelope(data.clone()));
            }
            return None;
        }

        if is_pair_object(first) {
            return Some(Self::PairArray(items.to_vec()));
        }

        None
    }

    fn detect_object(value: &Value) -> Result<Option<Self>, UpstreamError> {
        let Some(obj) = value.as_object() else {
            return Ok(None);
        };

        for (field, inner) in obj {
            if let Some(items) = inner.as_array() {
                if items.first().is_some_and(is_pair_object) {
                    return Ok(Some(Self::NestedPairs {
                        field: field.clone(),
                        items: items.clone(),
                    }));
                }
            }
        }

        if is_pair_object(value) {
            return Ok(Some(Self::SinglePair(value.clone())));
        }

        if let Some(text) = obj.get("extracted_text") {
            return non_empty_text(text, "extracted_text").map(|t| Some(Self::ExtractedText(t)));
        }

        if let Some(first) = obj
            .get("responses")
            .and_then(Value::as_array)
            .and_then(|responses| responses.first())
        {
            if let Some(text) = first.pointer("/fullTextAnnotation/text") {
                return non_empty_text(text, "vision_responses")
                    .map(|t| Some(Self::VisionResponses(t)));
            }
            return Ok(None);
        }

        if let Some(text) = value.pointer("/fullTextAnnotation/text") {
            return non_empty_text(text, "full_text_annotation")
                .map(|t| Some(Self::FullTextAnnotation(t)));
        }

        if let Some(text) = obj.get("text") {
            return non_empty_text(text, "text").map(|t| Some(Self::Text(t)));
        }

        for field in TEXT_FIELDS {
            if let Some(text) = obj.get(field).and_then(Value::as_str) {
                return Ok(Some(Self::TextField {
                    field,
                    text: text.to_string(),
                }));
            }
        }

        Ok(None)
    }

    /// Short name of the shape, for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::PairEnvelope(_) => "pair_envelope",
            Self::PairArray(_) => "pair_array",
            Self::NestedPairs { .. } => "nested_pairs",
            Self::SinglePair(_) => "single_pair",
            Self::ExtractedText(_) => "extracted_text",
            Self::VisionResponses(_) => "vision_responses",
            Self::FullTextAnnotation(_) => "full_text_annotation",
            Self::Text(_) => "text",
            Self::TextField { .. } => "text_field",
        }
    }

    /// Whether this shape goes through the key/value pipeline.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Self::PairEnvelope(_)
                | Self::PairArray(_)
                | Self::NestedPairs { .. }
                | Self::SinglePair(_)
        )
    }

    /// Run the matching pipeline with default extraction settings.
    pub fn into_parsed(self) -> ParsedTicket {
        self.into_parsed_with(&FreeTextParser::new())
    }

    /// Run the matching pipeline, using `parser` for text payloads.
    pub fn into_parsed_with(self, parser: &FreeTextParser) -> ParsedTicket {
        info!("Parsing upstream {} payload", self.shape());

        match self {
            Self::PairEnvelope(items)
            | Self::PairArray(items)
            | Self::NestedPairs { items, .. } => parse_pair_items(items),
            Self::SinglePair(item) => {
                warn!("Upstream returned a single key/value object instead of an array");
                parse_pair_items(vec![item])
            }
            Self::ExtractedText(text)
            | Self::VisionResponses(text)
            | Self::FullTextAnnotation(text)
            | Self::Text(text)
            | Self::TextField { text, .. } => ParsedTicket {
                record: parser.parse(&text),
                raw_text: text,
            },
        }
    }
}

/// Recognize an upstream response and map it to a record.
pub fn parse_upstream(value: &Value) -> Result<ParsedTicket, UpstreamError> {
    UpstreamPayload::detect(value).map(UpstreamPayload::into_parsed)
}

fn parse_pair_items(items: Vec<Value>) -> ParsedTicket {
    let pairs = pairs_from_json(&items);
    let record = parse_structured_pairs(&pairs);
    let items = Value::Array(items);
    let raw_text = serde_json::to_string_pretty(&items).unwrap_or_else(|_| items.to_string());

    ParsedTicket { record, raw_text }
}

fn non_empty_text(value: &Value, shape: &'static str) -> Result<String, UpstreamError> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(UpstreamError::EmptyText { shape }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(value: &Value) -> String {
    value.to_string().chars().take(PREVIEW_CHARS).collect()
}
