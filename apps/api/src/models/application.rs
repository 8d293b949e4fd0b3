use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::cv::CandidateRecord;

/// How the candidate chose to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationType {
    /// Fields typed into the form; a CV is generated on demand.
    #[default]
    Manual,
    /// The candidate uploaded their own CV file.
    CvUpload,
}

impl ApplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::Manual => "MANUAL",
            ApplicationType::CvUpload => "CV_UPLOAD",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MANUAL" => Some(ApplicationType::Manual),
            "CV_UPLOAD" => Some(ApplicationType::CvUpload),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Masculin",
            Gender::Female => "Féminin",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// How the candidate heard about the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HowHeard {
    #[serde(rename = "AFFICHE")]
    Poster,
    #[serde(rename = "MOTEUR_RECHERCHE")]
    SearchEngine,
    #[serde(rename = "PERSONNE")]
    Person,
}

impl HowHeard {
    pub fn code(&self) -> &'static str {
        match self {
            HowHeard::Poster => "AFFICHE",
            HowHeard::SearchEngine => "MOTEUR_RECHERCHE",
            HowHeard::Person => "PERSONNE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HowHeard::Poster => "Affiche",
            HowHeard::SearchEngine => "Moteur de recherche",
            HowHeard::Person => "A travers une personne",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AFFICHE" => Some(HowHeard::Poster),
            "MOTEUR_RECHERCHE" => Some(HowHeard::SearchEngine),
            "PERSONNE" => Some(HowHeard::Person),
            _ => None,
        }
    }
}

/// A persisted job application, one row of `job_applications`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub application_type: String,
    pub family_name: Option<String>,
    pub middle_name: Option<String>,
    pub given_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub phone: String,
    pub city: Option<String>,
    pub how_heard: Option<String>,
    pub how_heard_details: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub languages: Option<String>,
    pub cv_file_key: Option<String>,
    pub message: String,
    pub applied_at: DateTime<Utc>,
    pub reviewed: bool,
    pub notes: String,
}

impl ApplicationRow {
    pub fn application_type(&self) -> ApplicationType {
        ApplicationType::from_code(&self.application_type).unwrap_or_default()
    }

    /// Projects the row onto the fields the CV renderer reads.
    /// `applied_at` is shifted into `display_offset` for the footer.
    pub fn to_candidate_record(&self, display_offset: FixedOffset) -> CandidateRecord {
        CandidateRecord {
            family_name: self.family_name.clone(),
            middle_name: self.middle_name.clone(),
            given_name: self.given_name.clone(),
            full_name: self.full_name.clone(),
            birth_date: self.date_of_birth,
            birth_place: self.birth_place.clone(),
            gender: self.gender.clone(),
            nationality: self.nationality.clone(),
            address: self.address.clone(),
            phone: Some(self.phone.clone()),
            city: self.city.clone(),
            how_heard: self.how_heard.clone(),
            how_heard_details: self.how_heard_details.clone(),
            education: self.education.clone(),
            skills: self.skills.clone(),
            languages: self.languages.clone(),
            message: Some(self.message.clone()),
            submitted_at: Some(self.applied_at.with_timezone(&display_offset).naive_local()),
        }
    }
}

/// A validated application ready to be inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewApplication {
    pub application_type: ApplicationType,
    pub family_name: Option<String>,
    pub middle_name: Option<String>,
    pub given_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub gender: Option<Gender>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub phone: String,
    pub city: Option<String>,
    pub how_heard: Option<HowHeard>,
    pub how_heard_details: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub languages: Option<String>,
    pub cv_file_key: Option<String>,
    pub message: String,
}
