//! Date-of-birth normalizer.
//!
//! Evaluation order, first success wins:
//! 1. An already-structured date is returned as-is.
//! 2. Blank input → `EmptyInput`.
//! 3. The strict numeric rules in `rules::STRICT_RULES`.
//! 4. French free text ("15 janvier 1990", "15 01 1990", "3 mai 85").
//! 5. Nothing matched → `InvalidFormat`.
//!
//! A parsed date is then range-checked against `today` and the 1900 floor.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::dates::rules::{self, expand_two_digit_year, DAY_MONTH_YEAR_SLASH};

/// Earliest accepted birth year.
pub const MIN_BIRTH_YEAR: i32 = 1900;

const FRENCH_MONTHS: [(&str, u32); 12] = [
    ("janvier", 1),
    ("février", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("août", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("décembre", 12),
];

/// Why a birth date was rejected. The `Display` text is the message shown to
/// the candidate next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("La date de naissance est requise.")]
    EmptyInput,

    #[error("Format de date invalide. Utilisez JJ/MM/AAAA (ex: 15/01/1990) ou 15 janvier 1990.")]
    InvalidFormat,

    #[error("La date de naissance ne peut pas être dans le futur.")]
    FutureDate,

    #[error("Veuillez entrer une date de naissance valide.")]
    TooOld,
}

impl DateParseError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DateParseError::EmptyInput => "EMPTY_INPUT",
            DateParseError::InvalidFormat => "INVALID_FORMAT",
            DateParseError::FutureDate => "FUTURE_DATE",
            DateParseError::TooOld => "TOO_OLD",
        }
    }
}

/// Raw birth-date value as received by the form layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthDateInput<'a> {
    /// Already a calendar date (e.g. from a typed date widget).
    Date(NaiveDate),
    Text(&'a str),
}

impl<'a> From<&'a str> for BirthDateInput<'a> {
    fn from(text: &'a str) -> Self {
        BirthDateInput::Text(text)
    }
}

impl From<NaiveDate> for BirthDateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        BirthDateInput::Date(date)
    }
}

/// Normalizes a birth date that may already be structured.
///
/// Structured dates bypass string parsing and range checks entirely.
pub fn normalize_birth_date(
    input: BirthDateInput<'_>,
    today: NaiveDate,
) -> Result<NaiveDate, DateParseError> {
    match input {
        BirthDateInput::Date(date) => Ok(date),
        BirthDateInput::Text(text) => normalize_date(text, today),
    }
}

/// Parses free-text birth-date input into a canonical date.
pub fn normalize_date(text: &str, today: NaiveDate) -> Result<NaiveDate, DateParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateParseError::EmptyInput);
    }

    let date = match rules::first_match(text) {
        Some((rule, date)) => {
            debug!("Birth date '{text}' matched {}", rule.pattern);
            date
        }
        None => parse_french_text(text).ok_or(DateParseError::InvalidFormat)?,
    };

    if date > today {
        return Err(DateParseError::FutureDate);
    }
    if date.year() < MIN_BIRTH_YEAR {
        return Err(DateParseError::TooOld);
    }
    Ok(date)
}

/// French free-text fallback: `<day> <month> <year> [ignored...]`.
///
/// The month token is looked up case-insensitively among the French month
/// names; anything else is used verbatim so a numeric month still works.
fn parse_french_text(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let day = format!("{:0>2}", tokens[0]);
    let month = french_month_number(tokens[1])
        .map(|m| format!("{m:02}"))
        .unwrap_or_else(|| tokens[1].to_string());
    let year = if tokens[2].chars().count() == 2 {
        let short: u32 = tokens[2].parse().ok()?;
        expand_two_digit_year(short).to_string()
    } else {
        tokens[2].to_string()
    };

    DAY_MONTH_YEAR_SLASH.parse(&format!("{day}/{month}/{year}"))
}

fn french_month_number(token: &str) -> Option<u32> {
    let lowered = token.to_lowercase();
    FRENCH_MONTHS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, number)| *number)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2025, 6, 1)
    }

    #[test]
    fn test_slash_dates_round_trip() {
        for (text, expected) in [
            ("15/01/1990", ymd(1990, 1, 15)),
            ("01/01/1900", ymd(1900, 1, 1)),
            ("29/02/2000", ymd(2000, 2, 29)),
            ("01/06/2025", ymd(2025, 6, 1)),
        ] {
            assert_eq!(normalize_date(text, today()), Ok(expected), "input {text}");
        }
    }

    #[test]
    fn test_invalid_calendar_date_is_invalid_format() {
        assert_eq!(
            normalize_date("31/02/2000", today()),
            Err(DateParseError::InvalidFormat)
        );
    }

    #[test]
    fn test_french_month_name() {
        assert_eq!(normalize_date("15 janvier 1990", today()), Ok(ymd(1990, 1, 15)));
        assert_eq!(normalize_date("3 Décembre 1985", today()), Ok(ymd(1985, 12, 3)));
        assert_eq!(normalize_date("1 AOÛT 2001", today()), Ok(ymd(2001, 8, 1)));
    }

    #[test]
    fn test_numeric_month_in_word_position() {
        assert_eq!(normalize_date("15 01 1990", today()), Ok(ymd(1990, 1, 15)));
        // Double space defeats the strict "DD MM YYYY" rule; free text catches it.
        assert_eq!(normalize_date("15  1  1990", today()), Ok(ymd(1990, 1, 15)));
    }

    #[test]
    fn test_free_text_short_year_uses_pivot() {
        assert_eq!(normalize_date("3 mai 85", today()), Ok(ymd(1985, 5, 3)));
        assert_eq!(normalize_date("3 mai 05", today()), Ok(ymd(2005, 5, 3)));
    }

    #[test]
    fn test_free_text_ignores_trailing_tokens() {
        assert_eq!(
            normalize_date("15 janvier 1990 à Kinshasa", today()),
            Ok(ymd(1990, 1, 15))
        );
    }

    #[test]
    fn test_unknown_month_word_is_invalid() {
        assert_eq!(
            normalize_date("15 january 1990", today()),
            Err(DateParseError::InvalidFormat)
        );
        assert_eq!(
            normalize_date("15 janvier", today()),
            Err(DateParseError::InvalidFormat)
        );
    }

    #[test]
    fn test_two_digit_year_pivot_at_fifty() {
        let far_future = ymd(2040, 1, 1);
        assert_eq!(normalize_date("01/01/30", far_future), Ok(ymd(2030, 1, 1)));
        assert_eq!(normalize_date("01/01/70", far_future), Ok(ymd(1970, 1, 1)));
        // Before 2030 the same input is a future date.
        assert_eq!(
            normalize_date("01/01/30", today()),
            Err(DateParseError::FutureDate)
        );
    }

    #[test]
    fn test_iso_format() {
        assert_eq!(normalize_date("1990-01-15", today()), Ok(ymd(1990, 1, 15)));
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize_date("", today()), Err(DateParseError::EmptyInput));
        assert_eq!(normalize_date("   \t", today()), Err(DateParseError::EmptyInput));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_date("  15/01/1990 \n", today()), Ok(ymd(1990, 1, 15)));
    }

    #[test]
    fn test_future_date_rejected() {
        let tomorrow = today().succ_opt().unwrap();
        let text = tomorrow.format("%d/%m/%Y").to_string();
        assert_eq!(normalize_date(&text, today()), Err(DateParseError::FutureDate));
    }

    #[test]
    fn test_too_old_rejected() {
        assert_eq!(
            normalize_date("01/01/1800", today()),
            Err(DateParseError::TooOld)
        );
        assert_eq!(
            normalize_date("31/12/1899", today()),
            Err(DateParseError::TooOld)
        );
    }

    #[test]
    fn test_structured_input_bypasses_parsing() {
        let date = ymd(1992, 7, 4);
        assert_eq!(normalize_birth_date(date.into(), today()), Ok(date));
        assert_eq!(
            normalize_birth_date("04/07/1992".into(), today()),
            Ok(date)
        );
    }

    #[test]
    fn test_error_messages_are_french() {
        assert_eq!(
            DateParseError::FutureDate.to_string(),
            "La date de naissance ne peut pas être dans le futur."
        );
        assert_eq!(DateParseError::TooOld.code(), "TOO_OLD");
    }
}
