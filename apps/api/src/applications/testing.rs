//! In-memory collaborators for handler tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::applications::repository::ApplicationRepository;
use crate::applications::storage::{CvStorage, StorageError};
use crate::applications::upload::DEFAULT_MAX_CV_BYTES;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, NewApplication};

pub fn test_config(staff_token: &str) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        s3_bucket: "careers-test".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_region: "us-east-1".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        staff_api_token: staff_token.to_string(),
        max_cv_upload_bytes: DEFAULT_MAX_CV_BYTES,
        display_offset: FixedOffset::east_opt(3600).unwrap(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

#[derive(Default)]
pub struct InMemoryApplicationRepository {
    rows: Mutex<Vec<ApplicationRow>>,
    fail_next_create: AtomicBool,
}

impl InMemoryApplicationRepository {
    pub fn all(&self) -> Vec<ApplicationRow> {
        self.rows.lock().unwrap().clone()
    }

    /// Makes the next `create` fail as if the database were down.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, application: &NewApplication) -> Result<ApplicationRow, AppError> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("insert failed")));
        }
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            application_type: application.application_type.as_str().to_string(),
            family_name: application.family_name.clone(),
            middle_name: application.middle_name.clone(),
            given_name: application.given_name.clone(),
            full_name: application.full_name.clone(),
            date_of_birth: application.date_of_birth,
            birth_place: application.birth_place.clone(),
            gender: application.gender.map(|g| g.code().to_string()),
            nationality: application.nationality.clone(),
            address: application.address.clone(),
            phone: application.phone.clone(),
            city: application.city.clone(),
            how_heard: application.how_heard.map(|h| h.code().to_string()),
            how_heard_details: application.how_heard_details.clone(),
            education: application.education.clone(),
            skills: application.skills.clone(),
            languages: application.languages.clone(),
            cv_file_key: application.cv_file_key.clone(),
            message: application.message.clone(),
            applied_at: Utc::now(),
            reviewed: false,
            notes: String::new(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryCvStorage {
    objects: Mutex<BTreeMap<String, Bytes>>,
}

impl InMemoryCvStorage {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Seeds an object directly, bypassing the upload path.
    pub fn insert(&self, key: &str, data: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from_static(data));
    }
}

#[async_trait]
impl CvStorage for InMemoryCvStorage {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
