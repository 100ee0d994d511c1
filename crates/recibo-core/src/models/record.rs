//! Receipt record models matching the fixed receipts table.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::ticket::derived::DerivedFields;
use crate::ticket::rules::is_category_code;
use crate::ticket::rules::store::DEFAULT_STORE_NAME_MAX_LEN;

/// A receipt mapped onto the receipts table.
///
/// Serialized field names are the table's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRecord {
    /// Register / terminal id, zero-padded when read from text.
    #[serde(rename = "id_caja")]
    pub register_id: Option<String>,

    /// Sales channel.
    #[serde(rename = "canal")]
    pub channel: Option<String>,

    /// Store code.
    #[serde(rename = "codigo_tienda")]
    pub store_code: Option<String>,

    /// Store name (at most 100 characters).
    #[serde(rename = "tienda_nombre")]
    pub store_name: Option<String>,

    /// Receipt date.
    #[serde(rename = "fecha")]
    pub date: Option<NaiveDate>,

    /// Receipt time.
    #[serde(rename = "hora")]
    pub time: Option<NaiveTime>,

    /// Electronic ticket authorization code (CAE).
    #[serde(rename = "ticket_electronico")]
    pub electronic_ticket: Option<String>,

    /// Receipt number.
    #[serde(rename = "id_boleta")]
    pub receipt_id: Option<String>,

    /// Unique id generated per parse; the downstream dedup key.
    #[serde(rename = "id_check")]
    pub record_id: Uuid,

    /// Amount subject to tax.
    #[serde(rename = "monto_op_gravada", default)]
    pub taxable_amount: f64,

    /// Amount charged.
    #[serde(rename = "importe_total", default)]
    pub total_amount: f64,

    /// Consumption surcharge.
    #[serde(rename = "recargo_consumo", default)]
    pub consumption_surcharge: f64,

    /// Tariff amount.
    #[serde(rename = "monto_tarifario", default)]
    pub tariff_amount: f64,

    /// Month of `date` (1-12).
    #[serde(rename = "mes")]
    pub month: Option<u32>,

    /// Year of `date`.
    #[serde(rename = "anio")]
    pub year: Option<i32>,

    /// `date` combined with `time`, or with midnight when no time was found.
    #[serde(rename = "momento")]
    pub timestamp: Option<NaiveDateTime>,

    /// Category code (`AC-04`).
    #[serde(rename = "a_c")]
    pub category_code: Option<String>,
}

/// Part of the business day a receipt falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    /// Before noon.
    Opening,
    /// Noon to 16:00.
    Midday,
    /// From 16:00 on.
    Closing,
}

impl DayPart {
    /// Classify an hour of the day.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Self::Opening,
            12..=15 => Self::Midday,
            _ => Self::Closing,
        }
    }

    /// Column-friendly name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opening => "apertura",
            Self::Midday => "medio_dia",
            Self::Closing => "cierre",
        }
    }
}

impl MappedRecord {
    /// An empty record with a fresh id and every default applied.
    pub fn empty() -> Self {
        Self {
            register_id: None,
            channel: None,
            store_code: None,
            store_name: None,
            date: None,
            time: None,
            electronic_ticket: None,
            receipt_id: None,
            record_id: Uuid::new_v4(),
            taxable_amount: 0.0,
            total_amount: 0.0,
            consumption_surcharge: 0.0,
            tariff_amount: 0.0,
            month: None,
            year: None,
            timestamp: None,
            category_code: None,
        }
    }

    /// Fields derived from the current date and time.
    pub fn derived(&self) -> DerivedFields {
        DerivedFields::compute(self.date, self.time)
    }

    /// Day part of the receipt, when a timestamp was derived.
    pub fn day_part(&self) -> Option<DayPart> {
        self.timestamp.map(|ts| DayPart::from_hour(ts.hour()))
    }

    /// Validate the record and return a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.date.is_none() {
            issues.push("Missing date".to_string());
        }

        if self.total_amount == 0.0 {
            issues.push("Total amount is zero".to_string());
        }

        for (name, value) in [
            ("taxable amount", self.taxable_amount),
            ("total amount", self.total_amount),
            ("consumption surcharge", self.consumption_surcharge),
            ("tariff amount", self.tariff_amount),
        ] {
            if value < 0.0 {
                issues.push(format!("Negative {} ({})", name, value));
            }
        }

        if let Some(name) = &self.store_name {
            if name.chars().count() > DEFAULT_STORE_NAME_MAX_LEN {
                issues.push(format!(
                    "Store name longer than {} characters",
                    DEFAULT_STORE_NAME_MAX_LEN
                ));
            }
        }

        if let Some(code) = &self.category_code {
            if !is_category_code(code) {
                issues.push(format!("Category code {:?} is not like AC-04", code));
            }
        }

        let derived = self.derived();
        if (self.month, self.year, self.timestamp)
            != (derived.month, derived.year, derived.timestamp)
        {
            issues.push("Month, year or timestamp disagree with date and time".to_string());
        }

        issues
    }

    /// Build the row a caller loads into the receipts table.
    ///
    /// Requires a date. Month, year and timestamp are recomputed from the
    /// date and time so the row is always consistent.
    pub fn to_load_row(
        &self,
        loaded_at: DateTime<Utc>,
        loaded_by: &str,
    ) -> Result<LoadRow, ValidationError> {
        if self.date.is_none() {
            return Err(ValidationError::MissingField("fecha"));
        }

        let loaded_by = loaded_by.trim().to_lowercase();
        if loaded_by.is_empty() {
            return Err(ValidationError::MissingField("usuario_carga"));
        }

        if let Some(code) = &self.category_code {
            if !is_category_code(code) {
                return Err(ValidationError::InvalidField {
                    field: "a_c",
                    reason: format!("{:?} does not match [A-Z]{{1,3}}-\\d{{1,3}}", code),
                });
            }
        }

        let mut record = self.clone();
        let derived = record.derived();
        record.month = derived.month;
        record.year = derived.year;
        record.timestamp = derived.timestamp;

        Ok(LoadRow {
            record,
            loaded_at,
            loaded_by,
        })
    }
}

impl Default for MappedRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// A validated record plus load metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRow {
    /// The receipt columns.
    #[serde(flatten)]
    pub record: MappedRecord,

    /// When the row was submitted.
    #[serde(rename = "fecha_carga")]
    pub loaded_at: DateTime<Utc>,

    /// Who submitted the row.
    #[serde(rename = "usuario_carga")]
    pub loaded_by: String,
}
