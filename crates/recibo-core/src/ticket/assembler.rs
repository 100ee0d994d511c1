//! Record assembly: resolved fields, derived fields, defaults and a fresh id.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::models::record::MappedRecord;

use super::derived::DerivedFields;

/// Values resolved by one of the pipelines, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields {
    pub register_id: Option<String>,
    pub channel: Option<String>,
    pub store_code: Option<String>,
    pub store_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub electronic_ticket: Option<String>,
    pub receipt_id: Option<String>,
    pub taxable_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub consumption_surcharge: Option<f64>,
    pub tariff_amount: Option<f64>,
    pub category_code: Option<String>,
}

impl ResolvedFields {
    /// Column names of the fields no rule resolved.
    pub fn missing(&self) -> Vec<&'static str> {
        let present = [
            ("id_caja", self.register_id.is_some()),
            ("canal", self.channel.is_some()),
            ("codigo_tienda", self.store_code.is_some()),
            ("tienda_nombre", self.store_name.is_some()),
            ("fecha", self.date.is_some()),
            ("hora", self.time.is_some()),
            ("ticket_electronico", self.electronic_ticket.is_some()),
            ("id_boleta", self.receipt_id.is_some()),
            ("monto_op_gravada", self.taxable_amount.is_some()),
            ("importe_total", self.total_amount.is_some()),
            ("recargo_consumo", self.consumption_surcharge.is_some()),
            ("monto_tarifario", self.tariff_amount.is_some()),
            ("a_c", self.category_code.is_some()),
        ];

        present
            .into_iter()
            .filter(|(_, found)| !found)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Build the final record.
///
/// Every call generates a new record id, so assembling the same fields twice
/// yields two distinct records.
pub fn assemble(fields: ResolvedFields) -> MappedRecord {
    let derived = DerivedFields::compute(fields.date, fields.time);

    MappedRecord {
        register_id: fields.register_id,
        channel: fields.channel,
        store_code: fields.store_code,
        store_name: fields.store_name,
        date: fields.date,
        time: fields.time,
        electronic_ticket: fields.electronic_ticket,
        receipt_id: fields.receipt_id,
        record_id: Uuid::new_v4(),
        taxable_amount: fields.taxable_amount.unwrap_or(0.0),
        total_amount: fields.total_amount.unwrap_or(0.0),
        consumption_surcharge: fields.consumption_surcharge.unwrap_or(0.0),
        tariff_amount: fields.tariff_amount.unwrap_or(0.0),
        month: derived.month,
        year: derived.year,
        timestamp: derived.timestamp,
        category_code: fields.category_code,
    }
}
