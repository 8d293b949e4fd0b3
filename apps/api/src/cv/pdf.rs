//! Serializes a `LaidOutDocument` to PDF bytes with `pdf-writer`.
//!
//! Output is deterministic for a given document: streams are left
//! uncompressed and no creation date is written.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use thiserror::Error;

use crate::cv::font_metrics::{FontFace, PageConfig};
use crate::cv::layout::{DrawOp, LaidOutDocument, Rgb};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document has no pages")]
    EmptyDocument,

    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the document as a PDF 1.7 file. Fonts are the standard-14
/// Helvetica pair, so nothing is embedded.
pub fn write_pdf(
    document: &LaidOutDocument,
    config: &PageConfig,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    if document.pages.is_empty() {
        return Err(RenderError::EmptyDocument);
    }

    let mut next_id = 1;
    let mut alloc = || {
        let id = Ref::new(next_id);
        next_id += 1;
        id
    };

    let catalog_id = alloc();
    let tree_id = alloc();
    let info_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_ids: Vec<(Ref, Ref)> = document.pages.iter().map(|_| (alloc(), alloc())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .creator(TextStr("careers"));

    for (font_id, face) in [(regular_id, FontFace::Regular), (bold_id, FontFace::Bold)] {
        pdf.type1_font(font_id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let media_box = Rect::new(0.0, 0.0, config.width_pt, config.height_pt);
    for (page, (page_id, content_id)) in document.pages.iter().zip(&page_ids) {
        {
            let mut writer = pdf.page(*page_id);
            writer.media_box(media_box);
            writer.parent(tree_id);
            writer.contents(*content_id);
            writer
                .resources()
                .fonts()
                .pair(Name(FontFace::Regular.resource_name()), regular_id)
                .pair(Name(FontFace::Bold.resource_name()), bold_id);
        }
        pdf.stream(*content_id, &page_content(&page.ops));
    }

    Ok(pdf.finish())
}

fn page_content(ops: &[DrawOp]) -> Vec<u8> {
    let mut content = Content::new();
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                let Rgb(r, g, b) = *color;
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(face.resource_name()), *size);
                content.next_line(*x, *y);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                let Rgb(r, g, b) = *color;
                content.save_state();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width);
                content.move_to(from.0, from.1);
                content.line_to(to.0, to.1);
                content.stroke();
                content.restore_state();
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let Rgb(r, g, b) = *color;
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
        }
    }
    content.finish()
}

/// Maps text onto WinAnsiEncoding. Latin-1 passes through; the typographic
/// characters WinAnsi places in 0x80..=0x9F are remapped; anything else
/// becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
