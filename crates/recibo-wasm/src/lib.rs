//! WASM bindings for retail receipt mapping.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

use recibo_core::models::config::ExtractionConfig;
use recibo_core::ticket::rules::identifiers::MAX_REGISTER_ID_WIDTH;
use recibo_core::{FreeTextParser, MappedRecord, StructuredPair, TicketParser, UpstreamPayload};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Map OCR text of a receipt to a record.
#[wasm_bindgen]
pub fn parse_free_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&recibo_core::parse_free_text(text))
}

/// Map an array of `{clave, valor}` (or `{key, value}`) objects to a record.
///
/// Entries without both a key and a value are skipped.
#[wasm_bindgen]
pub fn parse_structured_pairs(pairs: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = from_js(pairs)?;
    let items = value
        .as_array()
        .ok_or_else(|| JsValue::from_str("expected an array of key/value objects"))?;

    let pairs: Vec<StructuredPair> = recibo_core::ticket::pairs_from_json(items);
    to_js(&recibo_core::parse_structured_pairs(&pairs))
}

/// Map a raw extraction service response, whatever its shape.
///
/// Returns `{ record, raw_text }`.
#[wasm_bindgen]
pub fn parse_upstream(response: JsValue) -> Result<JsValue, JsValue> {
    let value: serde_json::Value = from_js(response)?;
    let parsed =
        recibo_core::parse_upstream(&value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&parsed)
}

/// Normalize an amount string (e.g., "2.690,00" or "2690.00").
#[wasm_bindgen]
pub fn normalize_amount(amount: &str) -> Option<f64> {
    recibo_core::normalize_amount(amount)
}

/// List the issues of a record before it is loaded.
#[wasm_bindgen]
pub fn validate_record(record: JsValue) -> Result<JsValue, JsValue> {
    let record: MappedRecord = from_js(record)?;
    to_js(&record.validate())
}

/// Build the load row for a record submitted now by `loaded_by`.
#[wasm_bindgen]
pub fn to_load_row(record: JsValue, loaded_by: &str) -> Result<JsValue, JsValue> {
    let record: MappedRecord = from_js(record)?;
    let loaded_at = DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64)
        .ok_or_else(|| JsValue::from_str("clock out of range"))?;

    let row = record
        .to_load_row(loaded_at, loaded_by)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&row)
}

/// Receipt mapper class for browser use.
#[wasm_bindgen]
pub struct ReceiptMapper {
    config: ExtractionConfig,
}

#[wasm_bindgen]
impl ReceiptMapper {
    /// Create a mapper with default extraction settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Width register ids are zero-padded to, capped at `MAX_REGISTER_ID_WIDTH`.
    #[wasm_bindgen]
    pub fn set_register_id_width(&mut self, width: usize) {
        self.config.register_id_width = width.min(MAX_REGISTER_ID_WIDTH);
    }

    /// Century added to two-digit years.
    #[wasm_bindgen]
    pub fn set_century_base(&mut self, base: i32) {
        self.config.century_base = base;
    }

    /// Maximum store name length, in characters.
    #[wasm_bindgen]
    pub fn set_store_name_max_len(&mut self, len: usize) {
        self.config.store_name_max_len = len.max(1);
    }

    fn parser(&self) -> FreeTextParser {
        FreeTextParser::new().with_config(self.config.clone())
    }

    /// Map OCR text with this mapper's settings.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser().parse(text))
    }

    /// Map an extraction service response with this mapper's settings.
    #[wasm_bindgen]
    pub fn parse_upstream(&self, response: JsValue) -> Result<JsValue, JsValue> {
        let value: serde_json::Value = from_js(response)?;
        let payload =
            UpstreamPayload::detect(&value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&payload.into_parsed_with(&self.parser()))
    }
}

impl Default for ReceiptMapper {
    fn default() -> Self {
        Self::new()
    }
}
