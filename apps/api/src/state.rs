use std::sync::Arc;

use crate::applications::repository::ApplicationRepository;
use crate::applications::storage::CvStorage;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Default: `PgApplicationRepository`.
    pub applications: Arc<dyn ApplicationRepository>,
    /// Default: `S3CvStorage`. Only touched for CV uploads.
    pub cv_storage: Arc<dyn CvStorage>,
    pub config: Config,
}
