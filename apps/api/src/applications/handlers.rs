use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::form::ApplicationForm;
use crate::applications::upload::{content_type_for, cv_storage_key, safe_name, CvFile};
use crate::cv::render_cv;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationType};
use crate::state::AppState;

const CV_FILE_FIELD: &str = "cv_file";
const CV_FILE_NOT_FOUND: &str = "Fichier CV non trouvé.";

#[derive(Debug, Serialize)]
pub struct ApplicationCreated {
    pub id: Uuid,
    pub application_type: ApplicationType,
    /// `family given - DD/MM/YYYY`
    pub candidate: String,
    pub applied_at: DateTime<Utc>,
}

impl ApplicationCreated {
    fn from_row(row: &ApplicationRow, state: &AppState) -> Self {
        Self {
            id: row.id,
            application_type: row.application_type(),
            candidate: row
                .to_candidate_record(state.config.display_offset)
                .summary_label(),
            applied_at: row.applied_at,
        }
    }
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(form): Json<ApplicationForm>,
) -> Result<(StatusCode, Json<ApplicationCreated>), AppError> {
    let application = form
        .validate(state.config.today(), None, state.config.max_cv_upload_bytes)
        .map_err(AppError::InvalidFields)?;

    let row = state.applications.create(&application).await?;
    let created = ApplicationCreated::from_row(&row, &state);
    info!("New application from {}", created.candidate);
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/applications/upload
///
/// Multipart form: text fields named like the JSON body plus a `cv_file`
/// part. `application_type` defaults to `CV_UPLOAD` here.
pub async fn handle_upload_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationCreated>), AppError> {
    let mut form = ApplicationForm::default();
    let mut cv_file: Option<CvFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == CV_FILE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            // An empty file input still sends a part.
            if !filename.is_empty() || !data.is_empty() {
                cv_file = Some(CvFile {
                    filename,
                    content_type,
                    data,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            form.set_field(&name, value);
        }
    }

    if form.application_type.is_none() {
        form.application_type = Some(ApplicationType::CvUpload.as_str().to_string());
    }

    let mut application = form
        .validate(
            state.config.today(),
            cv_file.as_ref(),
            state.config.max_cv_upload_bytes,
        )
        .map_err(AppError::InvalidFields)?;

    // The CV is optional for manual entries but kept whenever one was sent.
    if let Some(file) = cv_file {
        let folder = safe_name(
            application.family_name.as_deref(),
            application.given_name.as_deref(),
            application.full_name.as_deref(),
        );
        let key = cv_storage_key(&folder, &file.filename);
        let content_type = content_type_for(&file.extension());
        state.cv_storage.put(&key, file.data, content_type).await?;
        application.cv_file_key = Some(key);
    }

    let row = match state.applications.create(&application).await {
        Ok(row) => row,
        Err(e) => {
            if let Some(key) = &application.cv_file_key {
                match state.cv_storage.delete(key).await {
                    Ok(()) => warn!("Removed CV {key} after failed insert"),
                    Err(cleanup) => warn!("CV {key} left orphaned after failed insert: {cleanup}"),
                }
            }
            return Err(e);
        }
    };
    let created = ApplicationCreated::from_row(&row, &state);
    info!(
        "New {} application from {}",
        row.application_type, created.candidate
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/applications/:id/cv
///
/// Staff only. Manual applications get their generated CV inline; CV
/// uploads get the stored file.
pub async fn handle_view_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    require_staff(&headers, &state.config.staff_api_token)?;
    let row = find_application(&state, id).await?;

    if row.application_type() == ApplicationType::CvUpload {
        return stored_cv_response(&state, &row).await;
    }

    let record = row.to_candidate_record(state.config.display_offset);
    let filename = content_disposition_filename(&record.pdf_filename(&row.id.to_string()));

    // Rendering is CPU-bound.
    let pdf = tokio::task::spawn_blocking(move || render_cv(&record))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CV render task failed: {e}")))??;

    file_response(pdf, "application/pdf", "inline", &filename)
}

/// GET /api/v1/applications/:id/cv-file
///
/// Staff only. Downloads the CV file the candidate uploaded, whatever the
/// application type.
pub async fn handle_download_cv_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    require_staff(&headers, &state.config.staff_api_token)?;
    let row = find_application(&state, id).await?;
    stored_cv_response(&state, &row).await
}

async fn find_application(state: &AppState, id: Uuid) -> Result<ApplicationRow, AppError> {
    state
        .applications
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

async fn stored_cv_response(state: &AppState, row: &ApplicationRow) -> Result<Response, AppError> {
    let Some(key) = row.cv_file_key.as_deref() else {
        return Err(AppError::NotFound(CV_FILE_NOT_FOUND.to_string()));
    };
    let Some(data) = state.cv_storage.get(key).await? else {
        warn!("Application {} points at missing object {key}", row.id);
        return Err(AppError::NotFound(CV_FILE_NOT_FOUND.to_string()));
    };

    let filename = key.rsplit('/').next().unwrap_or(key);
    let extension = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
    file_response(
        data,
        content_type_for(&extension),
        "attachment",
        &content_disposition_filename(filename),
    )
}

fn file_response(
    data: Bytes,
    content_type: &'static str,
    disposition: &str,
    filename: &str,
) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&format!("{disposition}; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

fn require_staff(headers: &HeaderMap, token: &str) -> Result<(), AppError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(presented) if !token.is_empty() && presented == token => Ok(()),
        _ => {
            warn!("Rejected CV view without valid staff token");
            Err(AppError::Unauthorized)
        }
    }
}

/// Header-safe file name: anything outside printable ASCII, quotes and
/// backslashes become `_`.
fn content_disposition_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
