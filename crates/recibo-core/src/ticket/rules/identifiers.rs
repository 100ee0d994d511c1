//! Register, electronic ticket and receipt number extraction.

use super::patterns::{
    ELECTRONIC_TICKET, RECEIPT_FACTURA_NO, RECEIPT_NRO_T, RECEIPT_NRO_TICKET, RECEIPT_TICKET_NO,
    REGISTER_ID,
};

/// Width register ids are zero-padded to.
pub const DEFAULT_REGISTER_ID_WIDTH: usize = 4;

/// Largest pad width accepted for register ids.
pub const MAX_REGISTER_ID_WIDTH: usize = 32;

/// Extract the register id printed after `Caja`, zero-padded to four digits.
pub fn extract_register_id(text: &str) -> Option<String> {
    extract_register_id_padded(text, DEFAULT_REGISTER_ID_WIDTH)
}

/// [`extract_register_id`] with an explicit pad width. Longer ids are kept whole.
///
/// Widths above [`MAX_REGISTER_ID_WIDTH`] are clamped.
pub fn extract_register_id_padded(text: &str, width: usize) -> Option<String> {
    let width = width.min(MAX_REGISTER_ID_WIDTH);
    REGISTER_ID
        .captures(text)
        .map(|caps| format!("{:0>width$}", &caps[1], width = width))
}

/// Extract the electronic ticket id printed after `CAE`.
pub fn extract_electronic_ticket(text: &str) -> Option<String> {
    ELECTRONIC_TICKET
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Extract the receipt number.
///
/// Labels are tried in order: `Nro T.`, `Nro Ticket`, `Ticket N°`,
/// `Factura N°`.
pub fn extract_receipt_id(text: &str) -> Option<String> {
    [
        &*RECEIPT_NRO_T,
        &*RECEIPT_NRO_TICKET,
        &*RECEIPT_TICKET_NO,
        &*RECEIPT_FACTURA_NO,
    ]
    .into_iter()
    .find_map(|pattern| pattern.captures(text).map(|caps| caps[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_id() {
        let cases = [
            ("Caja 12", Some("0012")),
            ("Caja 0012", Some("0012")),
            ("CAJA   7 Cajero 3", Some("0007")),
            ("Caja 123456", Some("123456")),
            ("Caja principal", None),
            ("", None),
        ];

        for (input, expected) in cases {
            assert_eq!(
                extract_register_id(input).as_deref(),
                expected,
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_register_id_width() {
        assert_eq!(extract_register_id_padded("Caja 5", 6).as_deref(), Some("000005"));
    }

    #[test]
    fn test_register_id_width_is_clamped() {
        let padded = extract_register_id_padded("Caja 5", usize::MAX).unwrap();
        assert_eq!(padded.len(), MAX_REGISTER_ID_WIDTH);
        assert!(padded.ends_with('5'));
    }

    #[test]
    fn test_electronic_ticket() {
        assert_eq!(
            extract_electronic_ticket("CAE 74454216986289").as_deref(),
            Some("74454216986289")
        );
        assert_eq!(
            extract_electronic_ticket("cae   123").as_deref(),
            Some("123")
        );
        assert_eq!(extract_electronic_ticket("CAE N/A"), None);
    }

    #[test]
    fn test_receipt_id_labels() {
        let cases = [
            ("Nro T. 00142012", Some("00142012")),
            ("Nro T 00142012", Some("00142012")),
            ("Nro Ticket 5501", Some("5501")),
            ("Ticket N° 77", Some("77")),
            ("Ticket No 78", Some("78")),
            ("Ticket 79", None),
            ("Factura N°0001", Some("0001")),
            ("Factura No. 0002", Some("0002")),
            ("Sin comprobante", None),
        ];

        for (input, expected) in cases {
            assert_eq!(
                extract_receipt_id(input).as_deref(),
                expected,
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_receipt_id_priority() {
        let text = "Factura N° 900\nNro T. 100";
        assert_eq!(extract_receipt_id(text).as_deref(), Some("100"));
    }
}
