//! Careers API: application intake with birth-date normalization, and
//! on-demand PDF CVs for manually entered applications.

pub mod applications;
pub mod config;
pub mod cv;
pub mod dates;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;

pub use cv::{render_cv, CandidateRecord, RenderError};
pub use dates::{normalize_date, DateParseError};
