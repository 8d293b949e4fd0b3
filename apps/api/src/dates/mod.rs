// Birth-date normalization for the application form.
// Free text in, canonical `NaiveDate` out. Pure and synchronous.

pub mod normalizer;
pub mod rules;

pub use normalizer::{normalize_birth_date, normalize_date, BirthDateInput, DateParseError};
