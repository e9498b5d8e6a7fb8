//! # Bill Numbers
//!
//! Formatting and recognition of human-readable bill numbers.
//! The database layer decides *which* number comes next; this module only
//! decides what it looks like.
//!
//! ```text
//!   sequenced:   BILL 20260301 0007      BILL{YYYYMMDD}{NNNN}
//!   timestamp:   BILL 1772355600123      BILL{epoch millis}
//! ```

use chrono::NaiveDate;

/// Prefix shared by every bill number.
pub const BILL_PREFIX: &str = "BILL";

/// Formats a per-day sequenced bill number.
///
/// The counter is zero-padded to four digits; larger values simply widen.
///
/// ```rust
/// use bookshop_core::bill_number::format_bill_number;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(format_bill_number(date, 7), "BILL202603010007");
/// ```
pub fn format_bill_number(date: NaiveDate, sequence: i64) -> String {
    format!("{}{}{:04}", BILL_PREFIX, date.format("%Y%m%d"), sequence)
}

/// Last-resort bill number from a Unix timestamp in milliseconds.
pub fn timestamp_bill_number(epoch_millis: i64) -> String {
    format!("{}{}", BILL_PREFIX, epoch_millis)
}

/// Checks for the `BILL` + 8-digit date + 4-digit counter shape.
pub fn is_sequenced_bill_number(bill_no: &str) -> bool {
    match bill_no.strip_prefix(BILL_PREFIX) {
        Some(rest) => {
            rest.len() == 12
                && rest.bytes().all(|b| b.is_ascii_digit())
                && NaiveDate::parse_from_str(&rest[..8], "%Y%m%d").is_ok()
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_sequence() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(format_bill_number(date, 1), "BILL202612310001");
        assert_eq!(format_bill_number(date, 1234), "BILL202612311234");
        assert_eq!(format_bill_number(date, 12345), "BILL2026123112345");
    }

    #[test]
    fn test_timestamp_number() {
        assert_eq!(timestamp_bill_number(1772355600123), "BILL1772355600123");
    }

    #[test]
    fn test_recognizes_sequenced_numbers() {
        assert!(is_sequenced_bill_number("BILL202603010007"));
        assert!(!is_sequenced_bill_number("BILL1772355600123"));
        assert!(!is_sequenced_bill_number("BILL20260301007"));
        assert!(!is_sequenced_bill_number("INV202603010007"));
        assert!(!is_sequenced_bill_number("BILL202613010007"));
    }
}
