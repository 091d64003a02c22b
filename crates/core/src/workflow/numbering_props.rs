//! Property-based tests for letter numbering.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::workflow::numbering::{LetterNumber, roman_month};

fn is_roman(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, 'I' | 'V' | 'X'))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every month has a roman numeral built from I, V and X.
    #[test]
    fn prop_every_month_has_roman(month in 1u32..=12) {
        let roman = roman_month(month);
        prop_assert!(roman.is_some_and(is_roman));
    }

    /// Formatted numbers have the documented shape and parse back.
    #[test]
    fn prop_number_shape(
        sequence in 1i32..=999,
        year in 2000i32..=2100,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let signed_at = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        let number = LetterNumber::new(sequence, "SK", "YPD", signed_at);
        let text = number.to_string();

        let parts: Vec<&str> = text.split('/').collect();
        prop_assert_eq!(parts.len(), 5);
        prop_assert_eq!(parts[0].len(), 3);
        prop_assert!(parts[0].chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(parts[1], "SK");
        prop_assert_eq!(parts[2], "YPD");
        prop_assert!(is_roman(parts[3]));
        prop_assert_eq!(parts[4].len(), 4);

        prop_assert_eq!(LetterNumber::parse(&text), Some(number));
    }

    /// Sequential counters produce strictly increasing numbers within a month.
    #[test]
    fn prop_sequence_orders_text(a in 1i32..=998) {
        let signed_at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let first = LetterNumber::new(a, "SK", "YPD", signed_at).to_string();
        let second = LetterNumber::new(a + 1, "SK", "YPD", signed_at).to_string();
        prop_assert!(first < second);
    }
}
