//! Receipt field extraction module.

pub mod assembler;
pub mod derived;
mod parser;
pub mod rules;
mod structured;
mod upstream;

pub use assembler::{assemble, ResolvedFields};
pub use derived::DerivedFields;
pub use parser::{parse_free_text, FreeTextParser};
pub use structured::{
    is_pair_object, pairs_from_json, parse_structured_pairs, PairValue, StructuredPair,
    StructuredPairMapper,
};
pub use upstream::{parse_upstream, UpstreamPayload};

use serde::Serialize;

use crate::models::record::MappedRecord;

/// Trait for receipt parsers.
///
/// Parsing never fails: fields that cannot be resolved are left absent or
/// defaulted on the returned record.
pub trait TicketParser {
    /// What the parser reads.
    type Input: ?Sized;

    /// Map the input to a fresh record.
    fn parse(&self, input: &Self::Input) -> MappedRecord;
}

/// A mapped record together with the text it was mapped from.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedTicket {
    pub record: MappedRecord,
    pub raw_text: String,
}
