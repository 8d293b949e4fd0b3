use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::application::{Gender, HowHeard};

/// Name shown when a record carries no usable name.
pub const PLACEHOLDER_NAME: &str = "Candidat";

/// The sparse set of fields a CV is rendered from.
///
/// Every field is optional. Blank and whitespace-only strings count as absent
/// everywhere the renderer decides whether to show something.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub family_name: Option<String>,
    pub middle_name: Option<String>,
    pub given_name: Option<String>,
    /// Single-field fallback used when family/given names are missing.
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    /// Gender code, `M` or `F`.
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    /// Referral code: `AFFICHE`, `MOTEUR_RECHERCHE` or `PERSONNE`.
    pub how_heard: Option<String>,
    pub how_heard_details: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub languages: Option<String>,
    pub message: Option<String>,
    /// Submission time, already in the zone it should be displayed in.
    pub submitted_at: Option<NaiveDateTime>,
}

impl CandidateRecord {
    /// `given family [middle]`, else the full-name fallback, else `Candidat`.
    pub fn display_name(&self) -> String {
        match (present(&self.family_name), present(&self.given_name)) {
            (Some(family), Some(given)) => match present(&self.middle_name) {
                Some(middle) => format!("{given} {family} {middle}"),
                None => format!("{given} {family}"),
            },
            _ => present(&self.full_name)
                .unwrap_or(PLACEHOLDER_NAME)
                .to_string(),
        }
    }

    /// `family given - DD/MM/YYYY`, the label used for a candidate in logs.
    pub fn summary_label(&self) -> String {
        let name = match (present(&self.family_name), present(&self.given_name)) {
            (Some(family), Some(given)) => format!("{family} {given}"),
            _ => present(&self.full_name)
                .unwrap_or(PLACEHOLDER_NAME)
                .to_string(),
        };
        let birth = self
            .birth_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!("{name} - {birth}")
    }

    /// File name for the rendered PDF: `CV_<family>_<given>.pdf`, else the full
    /// name with spaces replaced, else `record_id`.
    pub fn pdf_filename(&self, record_id: &str) -> String {
        let stem = match (present(&self.family_name), present(&self.given_name)) {
            (Some(family), Some(given)) => format!("{family}_{given}"),
            _ => match present(&self.full_name) {
                Some(full) => full.replace(' ', "_"),
                None => record_id.to_string(),
            },
        };
        format!("CV_{stem}.pdf")
    }

    /// Display text for the gender code; unknown codes are shown as-is.
    pub fn gender_label(&self) -> Option<&str> {
        present(&self.gender).map(|code| Gender::from_code(code).map_or(code, |g| g.label()))
    }

    /// Display text for the referral code; unknown codes are shown as-is.
    pub fn referral_label(&self) -> Option<&str> {
        present(&self.how_heard).map(|code| HowHeard::from_code(code).map_or(code, |h| h.label()))
    }
}

/// `Some(trimmed)` when the field holds visible text.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(family: Option<&str>, given: Option<&str>, full: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            family_name: family.map(String::from),
            given_name: given.map(String::from),
            full_name: full.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_display_name_prefers_given_family_middle() {
        let mut record = named(Some("Kabila"), Some("Jean"), Some("ignored"));
        assert_eq!(record.display_name(), "Jean Kabila");
        record.middle_name = Some("Mulumba".to_string());
        assert_eq!(record.display_name(), "Jean Kabila Mulumba");
    }

    #[test]
    fn test_display_name_needs_both_family_and_given() {
        let record = named(Some("Kabila"), None, Some("Jean K."));
        assert_eq!(record.display_name(), "Jean K.");
    }

    #[test]
    fn test_display_name_placeholder() {
        assert_eq!(CandidateRecord::default().display_name(), "Candidat");
        assert_eq!(named(Some("  "), Some(""), Some(" ")).display_name(), "Candidat");
    }

    #[test]
    fn test_pdf_filename_fallbacks() {
        assert_eq!(
            named(Some("Kabila"), Some("Jean"), None).pdf_filename("42"),
            "CV_Kabila_Jean.pdf"
        );
        assert_eq!(
            named(None, None, Some("Jean Pierre Kabila")).pdf_filename("42"),
            "CV_Jean_Pierre_Kabila.pdf"
        );
        assert_eq!(CandidateRecord::default().pdf_filename("42"), "CV_42.pdf");
    }

    #[test]
    fn test_summary_label() {
        let mut record = named(Some("Kabila"), Some("Jean"), None);
        assert_eq!(record.summary_label(), "Kabila Jean - N/A");
        record.birth_date = NaiveDate::from_ymd_opt(1990, 1, 15);
        assert_eq!(record.summary_label(), "Kabila Jean - 15/01/1990");
    }

    #[test]
    fn test_code_labels() {
        let record = CandidateRecord {
            gender: Some("F".to_string()),
            how_heard: Some("MOTEUR_RECHERCHE".to_string()),
            ..Default::default()
        };
        assert_eq!(record.gender_label(), Some("Féminin"));
        assert_eq!(record.referral_label(), Some("Moteur de recherche"));

        let unknown = CandidateRecord {
            gender: Some("X".to_string()),
            how_heard: Some("RADIO".to_string()),
            ..Default::default()
        };
        assert_eq!(unknown.gender_label(), Some("X"));
        assert_eq!(unknown.referral_label(), Some("RADIO"));
    }
}
