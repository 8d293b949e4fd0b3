//! Persistence for job applications.
//!
//! `AppState` holds an `Arc<dyn ApplicationRepository>`; the Postgres
//! implementation is used in production, tests swap in an in-memory one.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, NewApplication};

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts the application and returns the stored row.
    async fn create(&self, application: &NewApplication) -> Result<ApplicationRow, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PgApplicationRepository
// ────────────────────────────────────────────────────────────────────────────

pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(&self, application: &NewApplication) -> Result<ApplicationRow, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO job_applications
                (id, application_type, family_name, middle_name, given_name, full_name,
                 date_of_birth, birth_place, gender, nationality, address, phone, city,
                 how_heard, how_heard_details, education, skills, languages,
                 cv_file_key, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(application.application_type.as_str())
        .bind(&application.family_name)
        .bind(&application.middle_name)
        .bind(&application.given_name)
        .bind(&application.full_name)
        .bind(application.date_of_birth)
        .bind(&application.birth_place)
        .bind(application.gender.map(|g| g.code()))
        .bind(&application.nationality)
        .bind(&application.address)
        .bind(&application.phone)
        .bind(&application.city)
        .bind(application.how_heard.map(|h| h.code()))
        .bind(&application.how_heard_details)
        .bind(&application.education)
        .bind(&application.skills)
        .bind(&application.languages)
        .bind(&application.cv_file_key)
        .bind(&application.message)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Stored {} application {}",
            row.application_type, row.id
        );
        Ok(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM job_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
