//! Core library for mapping retail receipts to records.
//!
//! This crate provides:
//! - Rule-based field extraction from OCR text of a receipt
//! - Mapping of key/value pairs produced by an upstream extraction step
//! - Recognition of the upstream response shapes
//! - The record model, its validation and the load row written downstream

pub mod error;
pub mod models;
pub mod ticket;

pub use error::{ReciboError, Result, UpstreamError, ValidationError};
pub use models::config::{ExtractionConfig, OutputConfig, ReciboConfig};
pub use models::record::{DayPart, LoadRow, MappedRecord};
pub use ticket::rules::normalize_amount;
pub use ticket::{
    parse_free_text, parse_structured_pairs, parse_upstream, FreeTextParser, PairValue,
    ParsedTicket, StructuredPair, StructuredPairMapper, TicketParser, UpstreamPayload,
};
