//! Job-application intake: form validation, CV uploads, persistence and the
//! staff CV view.

pub mod form;
pub mod handlers;
pub mod repository;
pub mod storage;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;
