//! Section assembly — decides which parts of the CV exist and what they say.
//!
//! Every section is included iff its backing fields have visible text. The
//! header and footer are always present. Order is fixed:
//! header → personal info → education → skills → languages → referral → footer.

use crate::cv::record::{present, CandidateRecord};

/// Bullet marker used for skills.
pub const BULLET: char = '•';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    PersonalInfo,
    Education,
    Skills,
    Languages,
    Referral,
    Footer,
}

impl SectionKind {
    /// Upper-cased section title, `None` for header and footer.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            SectionKind::Header | SectionKind::Footer => None,
            SectionKind::PersonalInfo => Some("INFORMATIONS PERSONNELLES"),
            SectionKind::Education => Some("FORMATION"),
            SectionKind::Skills => Some("COMPÉTENCES"),
            SectionKind::Languages => Some("LANGUES PARLÉES"),
            SectionKind::Referral => Some("RÉFÉRENCE"),
        }
    }
}

/// One unit of section content, before any geometry is assigned.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Candidate name, rendered large and upper-cased.
    Name(String),
    /// Header contact line: bold label then value.
    Contact { label: &'static str, value: String },
    /// Two-column label/value row.
    Row { label: &'static str, value: String },
    /// Body text line. An empty string keeps a blank line.
    Line(String),
    /// Bold body text line.
    Strong(String),
    /// Centered small print.
    Note(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

/// Builds the ordered section list for a record.
pub fn build_sections(record: &CandidateRecord) -> Vec<Section> {
    let mut sections = vec![header(record)];

    let personal = personal_rows(record);
    if !personal.is_empty() {
        sections.push(Section {
            kind: SectionKind::PersonalInfo,
            blocks: personal,
        });
    }

    if let Some(education) = present(&record.education) {
        sections.push(Section {
            kind: SectionKind::Education,
            blocks: education
                .lines()
                .map(|line| Block::Line(line.trim_end().to_string()))
                .collect(),
        });
    }

    // The cascade inspects the raw text, so only the presence check trims.
    if let (Some(_), Some(skills)) = (present(&record.skills), record.skills.as_deref()) {
        sections.push(Section {
            kind: SectionKind::Skills,
            blocks: format_skills(skills).into_iter().map(Block::Line).collect(),
        });
    }

    if let Some(languages) = present(&record.languages) {
        sections.push(Section {
            kind: SectionKind::Languages,
            blocks: vec![Block::Line(languages.to_string())],
        });
    }

    if let Some(label) = record.referral_label() {
        let mut blocks = vec![Block::Strong(label.to_string())];
        if let Some(details) = present(&record.how_heard_details) {
            blocks.push(Block::Line(details.to_string()));
        }
        sections.push(Section {
            kind: SectionKind::Referral,
            blocks,
        });
    }

    sections.push(footer(record));
    sections
}

/// Turns the free-text skills block into display lines.
///
/// Cascade, first branch wins:
/// 1. contains a newline → one bullet per non-empty trimmed line
/// 2. contains ", " and no bullet → one bullet per non-empty comma item
/// 3. no bullet → the whole text as a single bullet
/// 4. already bulleted → untouched
///
/// Branch 1 runs even when lines already carry bullets.
pub fn format_skills(text: &str) -> Vec<String> {
    if text.contains('\n') {
        text.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(bulleted)
            .collect()
    } else if text.contains(", ") && !text.contains(BULLET) {
        text.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(bulleted)
            .collect()
    } else if !text.contains(BULLET) {
        vec![bulleted(text)]
    } else {
        vec![text.to_string()]
    }
}

fn bulleted(item: &str) -> String {
    format!("{BULLET} {item}")
}

fn header(record: &CandidateRecord) -> Section {
    let mut blocks = vec![Block::Name(record.display_name().to_uppercase())];
    for (label, field) in [
        ("Téléphone:", &record.phone),
        ("Adresse:", &record.address),
        ("Ville:", &record.city),
    ] {
        if let Some(value) = present(field) {
            blocks.push(Block::Contact {
                label,
                value: value.to_string(),
            });
        }
    }
    Section {
        kind: SectionKind::Header,
        blocks,
    }
}

fn personal_rows(record: &CandidateRecord) -> Vec<Block> {
    let mut rows = Vec::new();
    if let Some(birth_date) = record.birth_date {
        rows.push(Block::Row {
            label: "Date de naissance:",
            value: birth_date.format("%d/%m/%Y").to_string(),
        });
    }
    if let Some(place) = present(&record.birth_place) {
        rows.push(Block::Row {
            label: "Lieu de naissance:",
            value: place.to_string(),
        });
    }
    if let Some(gender) = record.gender_label() {
        rows.push(Block::Row {
            label: "Sexe:",
            value: gender.to_string(),
        });
    }
    if let Some(nationality) = present(&record.nationality) {
        rows.push(Block::Row {
            label: "Nationalité:",
            value: nationality.to_string(),
        });
    }
    rows
}

fn footer(record: &CandidateRecord) -> Section {
    let blocks = record
        .submitted_at
        .map(|at| {
            Block::Note(format!(
                "Candidature soumise le {}",
                at.format("%d/%m/%Y à %H:%M")
            ))
        })
        .into_iter()
        .collect();
    Section {
        kind: SectionKind::Footer,
        blocks,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
