//! Key/value pair mapper for receipts already segmented upstream.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::models::record::MappedRecord;

use super::assembler::{assemble, ResolvedFields};
use super::rules::amounts::normalize_amount;
use super::TicketParser;

/// One `(key, value)` unit from the upstream extraction step.
///
/// Accepts the upstream spelling `{"clave": ..., "valor": ...}` as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPair {
    #[serde(alias = "clave")]
    pub key: String,
    #[serde(alias = "valor")]
    pub value: PairValue,
}

/// Value of a pair, kept as typed upstream.
///
/// Numbers never go through separator normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PairValue {
    Number(f64),
    Text(String),
}

impl PairValue {
    /// Empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Trimmed text; numbers have no text form here.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s.trim()),
        }
    }

    /// Value as a string column.
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    /// Value as an amount; text goes through [`normalize_amount`].
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.is_finite().then_some(*n),
            Self::Text(s) => normalize_amount(s),
        }
    }
}

impl From<&str> for PairValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PairValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for PairValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl StructuredPair {
    pub fn new(key: impl Into<String>, value: impl Into<PairValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Read a pair from loosely typed JSON.
    ///
    /// Numbers stay numeric, booleans are stringified and `null` becomes an
    /// empty value. Objects without both a key and a value are rejected.
    pub fn from_json(item: &Value) -> Option<Self> {
        let obj = item.as_object()?;
        let key = obj.get("key").or_else(|| obj.get("clave"))?.as_str()?;
        let value = obj.get("value").or_else(|| obj.get("valor"))?;

        let value = match value {
            Value::String(s) => PairValue::Text(s.clone()),
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| PairValue::Text(n.to_string()), PairValue::Number),
            Value::Null => PairValue::Text(String::new()),
            other => PairValue::Text(other.to_string()),
        };

        Some(Self::new(key, value))
    }
}

/// Whether `item` is an object carrying both a key and a value.
pub fn is_pair_object(item: &Value) -> bool {
    item.as_object().is_some_and(|obj| {
        (obj.contains_key("key") || obj.contains_key("clave"))
            && (obj.contains_key("value") || obj.contains_key("valor"))
    })
}

/// Convert a JSON array of pair objects, skipping malformed entries.
pub fn pairs_from_json(items: &[Value]) -> Vec<StructuredPair> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let pair = StructuredPair::from_json(item);
            if pair.is_none() {
                debug!("Skipping structured entry {}: not a key/value object", index);
            }
            pair
        })
        .collect()
}

/// Maps key/value pairs onto the record by key name.
#[derive(Debug, Clone, Default)]
pub struct StructuredPairMapper;

impl StructuredPairMapper {
    pub fn new() -> Self {
        Self
    }

    /// Resolve every field from the pairs.
    pub fn resolve(&self, pairs: &[StructuredPair]) -> ResolvedFields {
        let lookup = PairLookup::build(pairs);

        let total_amount = lookup.amount(&["importe_total"]);

        ResolvedFields {
            register_id: lookup.string(&["id_caja"]),
            channel: lookup.string(&["canal_de_venta", "canal"]),
            store_code: lookup.string(&["local", "codigo_tienda"]),
            store_name: lookup.string(&["competidor", "tienda_nombre"]),
            date: lookup.text(&["fecha"]).and_then(parse_pair_date),
            time: lookup.text(&["hora"]).and_then(parse_pair_time),
            electronic_ticket: lookup.string(&["ticket_electronico"]),
            receipt_id: lookup.string(&["numero_de_ticket", "id_boleta"]),
            // No taxable-amount key is read; it mirrors the total.
            taxable_amount: total_amount,
            total_amount,
            consumption_surcharge: lookup.amount(&["recargo_consumo"]),
            tariff_amount: lookup.amount(&["monto_tarifario"]),
            category_code: lookup.string(&["a_c"]),
        }
    }
}

impl TicketParser for StructuredPairMapper {
    type Input = [StructuredPair];

    fn parse(&self, pairs: &[StructuredPair]) -> MappedRecord {
        info!("Mapping {} structured pairs", pairs.len());

        let fields = self.resolve(pairs);
        let missing = fields.missing();
        if !missing.is_empty() {
            debug!("Fields not found in pairs: {}", missing.join(", "));
        }

        assemble(fields)
    }
}

/// Map key/value pairs onto a record.
pub fn parse_structured_pairs(pairs: &[StructuredPair]) -> MappedRecord {
    StructuredPairMapper::new().parse(pairs)
}

/// Case-normalized view of the pairs; the last pair for a key wins.
struct PairLookup<'a> {
    values: HashMap<String, &'a PairValue>,
}

impl<'a> PairLookup<'a> {
    fn build(pairs: &'a [StructuredPair]) -> Self {
        let mut values = HashMap::with_capacity(pairs.len());
        for pair in pairs {
            let key = pair.key.trim().to_lowercase();
            debug!("Mapped pair {} = {:?}", key, pair.value);
            values.insert(key, &pair.value);
        }
        Self { values }
    }

    /// First non-blank value among `keys`.
    fn get(&self, keys: &[&str]) -> Option<&'a PairValue> {
        keys.iter()
            .filter_map(|key| self.values.get(*key).copied())
            .find(|value| !value.is_blank())
    }

    fn text(&self, keys: &[&str]) -> Option<&'a str> {
        self.get(keys).and_then(PairValue::as_text)
    }

    fn string(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).map(PairValue::to_text)
    }

    fn amount(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys).and_then(PairValue::as_amount)
    }
}

/// Parse `YYYY-MM-DD`, `DD/MM/YYYY` or `DD-MM-YYYY`.
fn parse_pair_date(s: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .filter(|date| (1000..=9999).contains(&date.year()))
}

/// Parse `HH:MM:SS`, padding `HH:MM` with zero seconds.
fn parse_pair_time(s: &str) -> Option<NaiveTime> {
    let padded = match s.split(':').count() {
        2 => format!("{}:00", s),
        3 => s.to_string(),
        _ => return None,
    };

    NaiveTime::parse_from_str(&padded, "%H:%M:%S").ok()
}
