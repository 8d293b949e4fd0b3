//! CV document builder — turns a sparse `CandidateRecord` into a PDF.
//!
//! Pipeline: `sections` decides what appears, `layout` flows it onto pages
//! and stamps "Page X / N" counters once the total is known, `pdf` writes
//! the bytes.

pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod record;
pub mod sections;

use std::io::Write;

use bytes::Bytes;
use tracing::debug;

pub use layout::LaidOutDocument;
pub use pdf::RenderError;
pub use record::CandidateRecord;

use font_metrics::default_page_config;

/// Lays out the record on A4 pages, counters included.
pub fn layout_cv(record: &CandidateRecord) -> LaidOutDocument {
    let config = default_page_config();
    let sections = sections::build_sections(record);
    let mut document = layout::layout_sections(&sections, &config);
    layout::stamp_page_counters(&mut document, &config);
    document
}

/// Renders the record to a complete PDF held in memory.
pub fn render_cv(record: &CandidateRecord) -> Result<Bytes, RenderError> {
    let document = layout_cv(record);
    let title = format!("CV - {}", record.display_name());
    let bytes = pdf::write_pdf(&document, &default_page_config(), &title)?;
    debug!(
        candidate = %record.summary_label(),
        pages = document.page_count(),
        size = bytes.len(),
        "CV rendered"
    );
    Ok(Bytes::from(bytes))
}

/// Renders the record and writes the PDF to `sink`.
pub fn render_cv_to<W: Write>(record: &CandidateRecord, sink: &mut W) -> Result<(), RenderError> {
    let bytes = render_cv(record)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}
