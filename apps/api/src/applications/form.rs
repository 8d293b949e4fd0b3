//! Application form validation.
//!
//! Raw text fields in, a `NewApplication` out. Every field is checked and all
//! messages are collected, so the candidate sees every problem at once. The
//! birth date goes through the date normalizer like any other field.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::applications::upload::{validate_cv_file, CvFile, UploadError};
use crate::dates::normalize_birth_date;
use crate::models::application::{ApplicationType, Gender, HowHeard, NewApplication};

const REQUIRED: &str = "Ce champ est obligatoire.";
const NAME_REQUIRED: &str = "Veuillez indiquer votre nom et prénom, ou votre nom complet.";

/// Raw submission, as typed into the form. Everything is text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub application_type: Option<String>,
    pub family_name: Option<String>,
    pub middle_name: Option<String>,
    pub given_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub birth_place: Option<String>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub how_heard: Option<String>,
    pub how_heard_details: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub languages: Option<String>,
    pub message: Option<String>,
}

/// Messages per field name, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl ApplicationForm {
    /// Form-field name → value, for filling the form from multipart parts.
    /// Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "application_type" => &mut self.application_type,
            "family_name" => &mut self.family_name,
            "middle_name" => &mut self.middle_name,
            "given_name" => &mut self.given_name,
            "full_name" => &mut self.full_name,
            "date_of_birth" => &mut self.date_of_birth,
            "birth_place" => &mut self.birth_place,
            "gender" => &mut self.gender,
            "nationality" => &mut self.nationality,
            "address" => &mut self.address,
            "phone" => &mut self.phone,
            "city" => &mut self.city,
            "how_heard" => &mut self.how_heard,
            "how_heard_details" => &mut self.how_heard_details,
            "education" => &mut self.education,
            "skills" => &mut self.skills,
            "languages" => &mut self.languages,
            "message" => &mut self.message,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Validates the whole submission against `today`.
    ///
    /// `cv_file` is required for `CV_UPLOAD` and checked whenever given. The
    /// returned application has no `cv_file_key` yet; storing the file is
    /// the caller's job.
    pub fn validate(
        &self,
        today: NaiveDate,
        cv_file: Option<&CvFile>,
        max_cv_bytes: usize,
    ) -> Result<NewApplication, FieldErrors> {
        let mut errors = FieldErrors::default();

        let application_type = match clean(&self.application_type) {
            None => ApplicationType::default(),
            Some(code) => ApplicationType::from_code(&code).unwrap_or_else(|| {
                errors.add("application_type", invalid_choice(&code));
                ApplicationType::default()
            }),
        };

        let family_name = bounded(&mut errors, "family_name", &self.family_name, 100);
        let middle_name = bounded(&mut errors, "middle_name", &self.middle_name, 100);
        let given_name = bounded(&mut errors, "given_name", &self.given_name, 100);
        let full_name = bounded(&mut errors, "full_name", &self.full_name, 200);
        let birth_place = bounded(&mut errors, "birth_place", &self.birth_place, 200);
        let nationality = bounded(&mut errors, "nationality", &self.nationality, 100);
        let address = bounded(&mut errors, "address", &self.address, 500);
        let phone = bounded(&mut errors, "phone", &self.phone, 20);
        let city = bounded(&mut errors, "city", &self.city, 100);
        let how_heard_details =
            bounded(&mut errors, "how_heard_details", &self.how_heard_details, 300);
        let languages = bounded(&mut errors, "languages", &self.languages, 200);

        if phone.is_none() && !errors.0.contains_key("phone") {
            errors.add("phone", REQUIRED);
        }

        let gender = clean(&self.gender).and_then(|code| {
            let parsed = Gender::from_code(&code);
            if parsed.is_none() {
                errors.add("gender", invalid_choice(&code));
            }
            parsed
        });
        let how_heard = clean(&self.how_heard).and_then(|code| {
            let parsed = HowHeard::from_code(&code);
            if parsed.is_none() {
                errors.add("how_heard", invalid_choice(&code));
            }
            parsed
        });

        let date_text = self.date_of_birth.as_deref().unwrap_or_default();
        // Optional for CV uploads when the CV carries the details.
        let date_of_birth = if application_type == ApplicationType::CvUpload
            && date_text.trim().is_empty()
        {
            None
        } else {
            match normalize_birth_date(date_text.into(), today) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.add("date_of_birth", e.to_string());
                    None
                }
            }
        };

        let has_split_name = family_name.is_some() && given_name.is_some();
        match application_type {
            ApplicationType::Manual => {
                if family_name.is_none() && !errors.0.contains_key("family_name") {
                    errors.add("family_name", REQUIRED);
                }
                if given_name.is_none() && !errors.0.contains_key("given_name") {
                    errors.add("given_name", REQUIRED);
                }
            }
            ApplicationType::CvUpload => {
                if !has_split_name && full_name.is_none() && !errors.0.contains_key("full_name") {
                    errors.add("full_name", NAME_REQUIRED);
                }
                if cv_file.is_none() {
                    errors.add("cv_file", UploadError::Missing.to_string());
                }
            }
        }

        if let Some(file) = cv_file {
            if let Err(e) = validate_cv_file(file, max_cv_bytes) {
                errors.add("cv_file", e.to_string());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewApplication {
            application_type,
            family_name,
            middle_name,
            given_name,
            full_name,
            date_of_birth,
            birth_place,
            gender,
            nationality,
            address,
            phone: phone.unwrap_or_default(),
            city,
            how_heard,
            how_heard_details,
            education: clean(&self.education),
            skills: clean_block(&self.skills),
            languages,
            cv_file_key: None,
            message: clean(&self.message).unwrap_or_default(),
        })
    }
}

/// Trimmed value, `None` when blank.
fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Like `clean` for presence, but keeps the text untouched. The skills block
/// is formatted from its raw layout, trailing newline included.
fn clean_block(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

fn bounded(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
    max_chars: usize,
) -> Option<String> {
    let value = clean(value)?;
    let len = value.chars().count();
    if len > max_chars {
        errors.add(
            field,
            format!(
                "Assurez-vous que cette valeur comporte au plus {max_chars} caractères (actuellement {len})."
            ),
        );
        return None;
    }
    Some(value)
}

fn invalid_choice(value: &str) -> String {
    format!("Sélectionnez un choix valide. {value} n'en fait pas partie.")
}
