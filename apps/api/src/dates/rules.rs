//! Ordered parse rules for numeric birth dates.
//!
//! Each `ParseRule` describes one fixed shape (`DD/MM/YYYY`, `YYYY-MM-DD`, ...).
//! Rules are strict: day and month accept 1–2 digits, a full year exactly 4
//! digits and a short year exactly 2 digits. A rule whose shape matches but
//! whose fields name an impossible calendar day (31/02) does not match.

use chrono::NaiveDate;

/// Short years at or above this value land in the 1900s, below it in the 2000s.
pub const TWO_DIGIT_YEAR_PIVOT: u32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Rule definition
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    DayMonthYear,
    YearMonthDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearWidth {
    /// Exactly four digits.
    Full,
    /// Exactly two digits, expanded around `TWO_DIGIT_YEAR_PIVOT`.
    Short,
}

/// One fixed date shape. `pattern` is the human-readable form, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRule {
    pub pattern: &'static str,
    separator: char,
    order: FieldOrder,
    year: YearWidth,
}

/// `DD/MM/YYYY` — also the target shape of the French free-text branch.
pub const DAY_MONTH_YEAR_SLASH: ParseRule = ParseRule {
    pattern: "DD/MM/YYYY",
    separator: '/',
    order: FieldOrder::DayMonthYear,
    year: YearWidth::Full,
};

/// The strict rules in evaluation order. The short-year rule sits after every
/// four-digit day-first rule so "01/01/1990" never reaches it.
pub static STRICT_RULES: [ParseRule; 5] = [
    DAY_MONTH_YEAR_SLASH,
    ParseRule {
        pattern: "DD-MM-YYYY",
        separator: '-',
        order: FieldOrder::DayMonthYear,
        year: YearWidth::Full,
    },
    ParseRule {
        pattern: "DD MM YYYY",
        separator: ' ',
        order: FieldOrder::DayMonthYear,
        year: YearWidth::Full,
    },
    ParseRule {
        pattern: "DD/MM/YY",
        separator: '/',
        order: FieldOrder::DayMonthYear,
        year: YearWidth::Short,
    },
    ParseRule {
        pattern: "YYYY-MM-DD",
        separator: '-',
        order: FieldOrder::YearMonthDay,
        year: YearWidth::Full,
    },
];

impl ParseRule {
    /// Parses `text` against this rule. `None` means "try the next rule".
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let mut parts = text.split(self.separator);
        let (first, second, third) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let (day, month, year) = match self.order {
            FieldOrder::DayMonthYear => (first, second, third),
            FieldOrder::YearMonthDay => (third, second, first),
        };

        let day = numeric_field(day, 1, 2)?;
        let month = numeric_field(month, 1, 2)?;
        let year = match self.year {
            YearWidth::Full => numeric_field(year, 4, 4)? as i32,
            YearWidth::Short => expand_two_digit_year(numeric_field(year, 2, 2)?),
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Returns the first strict rule that parses `text`, with the date it produced.
pub fn first_match(text: &str) -> Option<(&'static ParseRule, NaiveDate)> {
    STRICT_RULES
        .iter()
        .find_map(|rule| rule.parse(text).map(|date| (rule, date)))
}

/// Expands a two-digit year: `>= 50` → 19xx, otherwise 20xx.
pub fn expand_two_digit_year(short: u32) -> i32 {
    if short >= TWO_DIGIT_YEAR_PIVOT {
        1900 + short as i32
    } else {
        2000 + short as i32
    }
}

fn numeric_field(field: &str, min_digits: usize, max_digits: usize) -> Option<u32> {
    if field.len() < min_digits
        || field.len() > max_digits
        || !field.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    field.parse().ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
