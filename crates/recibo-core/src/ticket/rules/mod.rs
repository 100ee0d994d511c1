//! Rule-based field extractors for retail receipts.
//!
//! Every rule is a pure function of the receipt text that returns `None` when
//! its pattern is not found or the value does not parse.

pub mod amounts;
pub mod category;
pub mod dates;
pub mod identifiers;
pub mod patterns;
pub mod store;

pub use amounts::{
    extract_amounts, extract_taxable_amount, extract_total_amount, normalize_amount, parse_amount,
    ReceiptAmounts,
};
pub use category::{extract_category_code, is_category_code};
pub use dates::{extract_date, extract_date_with_base, extract_time, parse_day_first_date};
pub use identifiers::{
    extract_electronic_ticket, extract_receipt_id, extract_register_id, extract_register_id_padded,
};
pub use store::{extract_store_code, extract_store_name, find_store_line, StoreLine};
