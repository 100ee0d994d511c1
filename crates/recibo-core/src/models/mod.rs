//! Data models.

pub mod config;
pub mod record;

pub use config::{ExtractionConfig, OutputConfig, ReciboConfig};
pub use record::{DayPart, LoadRow, MappedRecord};
