//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Register / terminal
    pub static ref REGISTER_ID: Regex = Regex::new(
        r"(?i)Caja\s+(\d+)"
    ).unwrap();

    // Store header line: "015 SAN MARTIN" (matched per trimmed line)
    pub static ref STORE_LINE: Regex = Regex::new(
        r"^(\d{2,4})\s+([A-Z\s]+)"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Dates: D/M/Y with 1-2 digit day and month, 2 or 4 digit year
    pub static ref LABELED_DATE: Regex = Regex::new(
        r"(?i)Fecha\s+(\d{1,2})[/\-](\d{1,2})[/\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref BARE_DATE: Regex = Regex::new(
        r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{4}|\d{2})\b"
    ).unwrap();

    // Times: H:MM:SS
    pub static ref LABELED_TIME: Regex = Regex::new(
        r"(?i)Hora\s+(\d{1,2}):(\d{2}):(\d{2})\b"
    ).unwrap();

    pub static ref BARE_TIME: Regex = Regex::new(
        r"\b(\d{1,2}):(\d{2}):(\d{2})\b"
    ).unwrap();

    // Electronic ticket authorization code
    pub static ref ELECTRONIC_TICKET: Regex = Regex::new(
        r"(?i)CAE\s+(\d+)"
    ).unwrap();

    // Receipt numbers, in priority order
    pub static ref RECEIPT_NRO_T: Regex = Regex::new(
        r"(?i)Nro\s+T\.?\s+(\d+)"
    ).unwrap();

    pub static ref RECEIPT_NRO_TICKET: Regex = Regex::new(
        r"(?i)Nro\s+Ticket\s+(\d+)"
    ).unwrap();

    pub static ref RECEIPT_TICKET_NO: Regex = Regex::new(
        r"(?i)Ticket\s+N(?:°|º|o\.?)?\s*(\d+)"
    ).unwrap();

    pub static ref RECEIPT_FACTURA_NO: Regex = Regex::new(
        r"(?i)Factura\s+N(?:°|º|o\.?)?\s*(\d+)"
    ).unwrap();

    // Amounts: 2.690,00 / 2690,00 / 2690.00
    pub static ref SUBTOTAL_NO_DISCOUNT: Regex = Regex::new(
        r"(?i)SUBTOTAL\s+SIN\s+DESCUENTOS\s*\$?\s*(\d+(?:[.,]\d{3})*[.,]\d{2})\b"
    ).unwrap();

    pub static ref SUBTOTAL: Regex = Regex::new(
        r"(?i)SUBTOTAL\s*\$?\s*(\d+(?:[.,]\d{3})*[.,]\d{2})\b"
    ).unwrap();

    // \b keeps SUBTOTAL lines from matching as the total.
    pub static ref TOTAL: Regex = Regex::new(
        r"(?i)\bTOTAL\s*\$?\s*(\d+(?:[.,]\d{3})*[.,]\d{2})\b"
    ).unwrap();

    // Category code: "AC-04"
    pub static ref CATEGORY_AFTER_ART: Regex = Regex::new(
        r"(?i)Art:?\s*.*?([A-Z]{1,3}-\d{1,3})"
    ).unwrap();

    pub static ref CATEGORY_LINE_END: Regex = Regex::new(
        r"([A-Z]{1,3}-\d{1,3})\s*$"
    ).unwrap();

    pub static ref CATEGORY_CODE: Regex = Regex::new(
        r"^[A-Z]{1,3}-\d{1,3}$"
    ).unwrap();
}
