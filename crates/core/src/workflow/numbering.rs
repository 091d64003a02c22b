//! Official letter numbers (nomor surat).
//!
//! A number reads `{sequence:03}/{code}/{organization}/{roman month}/{year}`,
//! for example `001/SK/YPD/I/2026`. The sequence itself comes from a
//! per-`(year, code)` counter kept in the database.

use chrono::{DateTime, Datelike, Utc};
use std::fmt;

const ROMAN_MONTHS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// Returns the roman numeral for a month (1-12).
#[must_use]
pub fn roman_month(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    ROMAN_MONTHS.get(index).copied()
}

/// Parses a roman month numeral back to 1-12.
#[must_use]
pub fn month_from_roman(roman: &str) -> Option<u32> {
    ROMAN_MONTHS
        .iter()
        .position(|m| *m == roman)
        .and_then(|i| u32::try_from(i + 1).ok())
}

/// A formatted official letter number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterNumber {
    /// Position in the `(year, code)` sequence, starting at 1.
    pub sequence: i32,
    /// Letter-type code, `SK` by default.
    pub code: String,
    /// Organization code, `YPD` by default.
    pub organization: String,
    /// Month of signing (1-12).
    pub month: u32,
    /// Year of signing.
    pub year: i32,
}

impl LetterNumber {
    /// Builds the number minted at `signed_at`.
    #[must_use]
    pub fn new(
        sequence: i32,
        code: impl Into<String>,
        organization: impl Into<String>,
        signed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            code: code.into(),
            organization: organization.into(),
            month: signed_at.month(),
            year: signed_at.year(),
        }
    }

    /// Parses a formatted number.
    ///
    /// Returns `None` if the string does not have five `/`-separated parts,
    /// the month is not a roman numeral I-XII, or the numeric parts fail to parse.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        let [seq, code, organization, month, year] = parts.as_slice() else {
            return None;
        };
        if seq.len() < 3 || !seq.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            sequence: seq.parse().ok()?,
            code: (*code).to_string(),
            organization: (*organization).to_string(),
            month: month_from_roman(month)?,
            year: year.parse().ok()?,
        })
    }
}

impl fmt::Display for LetterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}/{}/{}/{}/{}",
            self.sequence,
            self.code,
            self.organization,
            roman_month(self.month).unwrap_or("?"),
            self.year
        )
    }
}
