//! Free-text receipt parser.

use std::borrow::Cow;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::MappedRecord;

use super::assembler::{assemble, ResolvedFields};
use super::rules::{
    amounts::extract_amounts,
    category::extract_category_code,
    dates::{extract_date_with_base, extract_time},
    identifiers::{extract_electronic_ticket, extract_receipt_id, extract_register_id_padded},
    store::{find_store_line, truncate_chars},
};
use super::TicketParser;

/// Parser for OCR text of a receipt.
#[derive(Debug, Clone, Default)]
pub struct FreeTextParser {
    config: ExtractionConfig,
}

impl FreeTextParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given extraction settings.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Run every field rule over `text`.
    pub fn resolve(&self, text: &str) -> ResolvedFields {
        let text = self.normalize(text);
        let text = text.as_ref();

        let store = find_store_line(text, self.config.store_scan_lines);
        let amounts = extract_amounts(text);

        ResolvedFields {
            register_id: extract_register_id_padded(text, self.config.register_id_width),
            // The channel is never printed on the receipt.
            channel: None,
            store_code: store.as_ref().map(|s| s.code.clone()),
            store_name: store.map(|s| truncate_chars(&s.name, self.config.store_name_max_len)),
            date: extract_date_with_base(text, self.config.century_base),
            time: extract_time(text),
            electronic_ticket: extract_electronic_ticket(text),
            receipt_id: extract_receipt_id(text),
            taxable_amount: amounts.taxable,
            total_amount: amounts.total,
            consumption_surcharge: None,
            tariff_amount: None,
            category_code: extract_category_code(text),
        }
    }

    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.config.unescape_newlines && text.contains("\\n") {
            Cow::Owned(text.replace("\\n", "\n"))
        } else {
            Cow::Borrowed(text)
        }
    }
}

impl TicketParser for FreeTextParser {
    type Input = str;

    fn parse(&self, text: &str) -> MappedRecord {
        info!("Parsing receipt from {} characters of text", text.len());

        let fields = self.resolve(text);
        let missing = fields.missing();
        if !missing.is_empty() {
            debug!("Fields not found in text: {}", missing.join(", "));
        }

        let record = assemble(fields);
        debug!("Mapped receipt text to record {}", record.record_id);
        record
    }
}

/// Parse OCR text of a receipt with default settings.
pub fn parse_free_text(raw_text: &str) -> MappedRecord {
    FreeTextParser::new().parse(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "015 SAN MARTIN\n\
        Caja 0012\n\
        Fecha 06/11/24\n\
        Hora 16:05:47\n\
        CAE 74454216986289\n\
        TOTAL $ 2.690,00\n";

    #[test]
    fn test_parse_sample_receipt() {
        let record = parse_free_text(SAMPLE);

        assert_eq!(record.store_code.as_deref(), Some("015"));
        assert_eq!(record.store_name.as_deref(), Some("SAN MARTIN"));
        assert_eq!(record.register_id.as_deref(), Some("0012"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 11, 6));
        assert_eq!(record.time, NaiveTime::from_hms_opt(16, 5, 47));
        assert_eq!(record.electronic_ticket.as_deref(), Some("74454216986289"));
        assert_eq!(record.total_amount, 2690.0);
        assert_eq!(record.taxable_amount, 2690.0);
        assert_eq!(record.month, Some(11));
        assert_eq!(record.year, Some(2024));
        assert_eq!(
            record.timestamp.map(|ts| ts.to_string()),
            Some("2024-11-06 16:05:47".to_string())
        );
        assert_eq!(record.channel, None);
        assert_eq!(record.consumption_surcharge, 0.0);
        assert_eq!(record.tariff_amount, 0.0);
    }

    #[test]
    fn test_full_receipt() {
        let text = "SUPERMERCADOS DEL SUR\n\
            0231 PALERMO SOHO\n\
            Caja 3  Nro T. 00142012\n\
            Fecha 28-02-2023 Hora 9:15:02\n\
            Art: AGUA MINERAL 2L AC-04\n\
            SUBTOTAL SIN DESCUENTOS $ 1.250,00\n\
            DESCUENTO $ 250,00\n\
            TOTAL $ 1.000,00\n\
            CAE 123456789\n";

        let record = parse_free_text(text);

        assert_eq!(record.store_code.as_deref(), Some("0231"));
        assert_eq!(record.store_name.as_deref(), Some("PALERMO SOHO"));
        assert_eq!(record.register_id.as_deref(), Some("0003"));
        assert_eq!(record.receipt_id.as_deref(), Some("00142012"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(record.time, NaiveTime::from_hms_opt(9, 15, 2));
        assert_eq!(record.category_code.as_deref(), Some("AC-04"));
        assert_eq!(record.taxable_amount, 1250.0);
        assert_eq!(record.total_amount, 1000.0);
        assert_eq!(record.electronic_ticket.as_deref(), Some("123456789"));
    }

    #[test]
    fn test_escaped_newlines() {
        let record = parse_free_text("015 SAN MARTIN\\nCaja 12\\nFecha 06/11/24");

        assert_eq!(record.store_name.as_deref(), Some("SAN MARTIN"));
        assert_eq!(record.register_id.as_deref(), Some("0012"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 11, 6));
    }

    #[test]
    fn test_date_without_time() {
        let record = parse_free_text("Fecha 06/11/2024\nTOTAL 10,00");

        assert_eq!(record.time, None);
        assert_eq!(
            record.timestamp.map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Some("2024-11-06T00:00:00".to_string())
        );
    }

    #[test]
    fn test_invalid_date_leaves_derived_absent() {
        let record = parse_free_text("Fecha 31/02/2024\nHora 10:00:00");

        assert_eq!(record.date, None);
        assert_eq!(record.month, None);
        assert_eq!(record.year, None);
        assert_eq!(record.timestamp, None);
        assert_eq!(record.time, NaiveTime::from_hms_opt(10, 0, 0));
    }

    #[test]
    fn test_empty_text_still_produces_record() {
        let record = parse_free_text("");

        assert_eq!(record.store_code, None);
        assert_eq!(record.total_amount, 0.0);
        assert_eq!(record.record_id.get_version_num(), 4);
    }

    #[test]
    fn test_identical_input_gets_distinct_ids() {
        let first = parse_free_text(SAMPLE);
        let second = parse_free_text(SAMPLE);

        assert_ne!(first.record_id, second.record_id);
        assert_eq!(first.total_amount, second.total_amount);
    }

    #[test]
    fn test_config_is_applied() {
        let config = ExtractionConfig {
            store_name_max_len: 3,
            register_id_width: 6,
            ..ExtractionConfig::default()
        };
        let record = FreeTextParser::new().with_config(config).parse(SAMPLE);

        assert_eq!(record.store_name.as_deref(), Some("SAN"));
        assert_eq!(record.register_id.as_deref(), Some("000012"));
    }
}
