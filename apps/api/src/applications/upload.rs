//! CV file checks and object-store naming for `CV_UPLOAD` applications.

use bytes::Bytes;
use thiserror::Error;

pub const DEFAULT_MAX_CV_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

const FALLBACK_SAFE_NAME: &str = "candidate";

/// An uploaded CV, as received from the multipart form.
#[derive(Debug, Clone)]
pub struct CvFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl CvFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Lower-cased text after the last `.`; the whole name when there is none.
    pub fn extension(&self) -> String {
        self.filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Veuillez télécharger votre CV.")]
    Missing,

    #[error("La taille du fichier ne doit pas dépasser {}MB.", .limit_bytes / (1024 * 1024))]
    TooLarge { limit_bytes: usize },

    #[error("Format de fichier non accepté. Utilisez: {}", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedExtension,
}

/// Size first, then extension.
pub fn validate_cv_file(file: &CvFile, max_bytes: usize) -> Result<(), UploadError> {
    if file.size() > max_bytes {
        return Err(UploadError::TooLarge {
            limit_bytes: max_bytes,
        });
    }
    if !ALLOWED_EXTENSIONS.contains(&file.extension().as_str()) {
        return Err(UploadError::UnsupportedExtension);
    }
    Ok(())
}

/// Folder name for a candidate's uploads: `family_given`, else the full name,
/// else `candidate`. Separators become `_`; anything but alphanumerics, `_`
/// and `-` is dropped.
pub fn safe_name(family: Option<&str>, given: Option<&str>, full: Option<&str>) -> String {
    let raw = match (non_blank(family), non_blank(given)) {
        (Some(family), Some(given)) => format!("{family}_{given}"),
        _ => match non_blank(full) {
            Some(full) => full.to_string(),
            None => return FALLBACK_SAFE_NAME.to_string(),
        },
    };
    let cleaned: String = raw
        .chars()
        .map(|c| if matches!(c, ' ' | '/' | '\\') { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
        .collect();
    if cleaned.is_empty() {
        FALLBACK_SAFE_NAME.to_string()
    } else {
        cleaned
    }
}

/// `cvs/{safe_name}/{filename}`. Only the last path component of the client
/// file name is kept.
pub fn cv_storage_key(safe_name: &str, filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("cv");
    format!("cvs/{safe_name}/{base}")
}

/// MIME type stored alongside the object.
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> CvFile {
        CvFile {
            filename: name.to_string(),
            content_type: None,
            data: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn test_accepts_allowed_extensions_any_case() {
        for name in ["cv.pdf", "CV.PDF", "mon.cv.Docx", "lettre.doc"] {
            assert_eq!(validate_cv_file(&file(name, 10), DEFAULT_MAX_CV_BYTES), Ok(()));
        }
    }

    #[test]
    fn test_rejects_other_extensions() {
        for name in ["cv.txt", "cv", "cv.pdf.exe"] {
            assert_eq!(
                validate_cv_file(&file(name, 10), DEFAULT_MAX_CV_BYTES),
                Err(UploadError::UnsupportedExtension)
            );
        }
        assert_eq!(
            UploadError::UnsupportedExtension.to_string(),
            "Format de fichier non accepté. Utilisez: pdf, doc, docx"
        );
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(validate_cv_file(&file("cv.pdf", DEFAULT_MAX_CV_BYTES), DEFAULT_MAX_CV_BYTES).is_ok());
        let err = validate_cv_file(&file("cv.pdf", DEFAULT_MAX_CV_BYTES + 1), DEFAULT_MAX_CV_BYTES)
            .unwrap_err();
        assert_eq!(err.to_string(), "La taille du fichier ne doit pas dépasser 5MB.");
    }

    #[test]
    fn test_safe_name_sources() {
        assert_eq!(safe_name(Some("Kabila"), Some("Jean Paul"), None), "Kabila_Jean_Paul");
        assert_eq!(safe_name(None, Some("Jean"), Some("Jean K/B")), "Jean_K_B");
        assert_eq!(safe_name(None, None, None), "candidate");
    }

    #[test]
    fn test_safe_name_strips_punctuation_and_keeps_accents() {
        assert_eq!(safe_name(Some("N'Sele"), Some("Élodie"), None), "NSele_Élodie");
        assert_eq!(safe_name(None, None, Some("!!!")), "candidate");
    }

    #[test]
    fn test_storage_key_keeps_only_base_name() {
        assert_eq!(cv_storage_key("Kabila_Jean", "cv.pdf"), "cvs/Kabila_Jean/cv.pdf");
        assert_eq!(
            cv_storage_key("Kabila_Jean", "C:\\Users\\jean\\cv.pdf"),
            "cvs/Kabila_Jean/cv.pdf"
        );
        assert_eq!(cv_storage_key("x", "../"), "cvs/x/cv");
    }
}
