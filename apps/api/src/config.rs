use anyhow::{Context, Result};
use chrono::FixedOffset;

use crate::applications::upload::DEFAULT_MAX_CV_BYTES;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Bearer token staff present to view generated CVs.
    pub staff_api_token: String,
    pub max_cv_upload_bytes: usize,
    /// Zone submission timestamps and "today" are read in. Kinshasa by default.
    pub display_offset: FixedOffset,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let offset_minutes = optional_env("DISPLAY_UTC_OFFSET_MINUTES", "60")
            .parse::<i32>()
            .context("DISPLAY_UTC_OFFSET_MINUTES must be a whole number of minutes")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: optional_env("S3_REGION", "us-east-1"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            staff_api_token: require_env("STAFF_API_TOKEN")?,
            max_cv_upload_bytes: optional_env("MAX_CV_UPLOAD_BYTES", &DEFAULT_MAX_CV_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_CV_UPLOAD_BYTES must be a byte count")?,
            display_offset: FixedOffset::east_opt(offset_minutes * 60)
                .context("DISPLAY_UTC_OFFSET_MINUTES is out of range")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    /// Current calendar date in the display zone.
    pub fn today(&self) -> chrono::NaiveDate {
        chrono::Utc::now().with_timezone(&self.display_offset).date_naive()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
