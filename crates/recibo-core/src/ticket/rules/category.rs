//! Category code extraction ("AC-04").

use super::patterns::{CATEGORY_AFTER_ART, CATEGORY_CODE, CATEGORY_LINE_END};

/// Extract the category code.
///
/// A code on the same line as `Art:` wins; otherwise the first line that
/// ends in a code is used. Codes are returned uppercase.
pub fn extract_category_code(text: &str) -> Option<String> {
    if let Some(caps) = CATEGORY_AFTER_ART.captures(text) {
        return Some(caps[1].to_uppercase());
    }

    text.lines()
        .find_map(|line| CATEGORY_LINE_END.captures(line))
        .map(|caps| caps[1].to_string())
}

/// Whether `code` has the `[A-Z]{1,3}-\d{1,3}` shape.
pub fn is_category_code(code: &str) -> bool {
    CATEGORY_CODE.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_after_art() {
        let cases = [
            ("Art: LECHE ENTERA 1L AC-04", Some("AC-04")),
            ("Art LECHE AC-4", Some("AC-4")),
            ("art: pan x-12", Some("X-12")),
            ("Art:\nAC-04", Some("AC-04")),
            ("Sin codigo", None),
        ];

        for (input, expected) in cases {
            assert_eq!(
                extract_category_code(input).as_deref(),
                expected,
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_category_at_line_end() {
        let text = "015 SAN MARTIN\nPRODUCTO VARIOS BE-101  \nTOTAL 10,00";
        assert_eq!(extract_category_code(text).as_deref(), Some("BE-101"));
    }

    #[test]
    fn test_art_line_wins_over_line_end() {
        let text = "VARIOS ZZ-1\nArt: GASEOSA AC-04 x2";
        assert_eq!(extract_category_code(text).as_deref(), Some("AC-04"));
    }

    #[test]
    fn test_is_category_code() {
        assert!(is_category_code("AC-04"));
        assert!(is_category_code("A-1"));
        assert!(!is_category_code("ac-04"));
        assert!(!is_category_code("ABCD-1"));
        assert!(!is_category_code("AC-1234"));
    }
}
