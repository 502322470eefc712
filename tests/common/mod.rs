use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use safiri_guard::notifier::Notifier;
use safiri_guard::notifier::error::NotifierError;
use safiri_guard::repository::Repository;
use uuid::Uuid;

pub async fn setup_db() -> (Arc<Repository>, PathBuf) {
    let uuid = Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("safiri-guard-test-{}.db", uuid));
    let db_url = format!("sqlite://{}", db_path.to_str().unwrap());

    let db = Repository::new(&db_url, db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");

    db.run_migrations().await.expect("Failed to run migrations");

    (Arc::new(db), db_path)
}

pub async fn teardown_db(db_path: PathBuf) {
    if db_path.exists() {
        let _ = std::fs::remove_file(db_path);
    }
}

// MOCK NOTIFIER

/// Records every send instead of hitting a gateway. Flip `fail` to make
/// the next sends report a gateway rejection.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockNotifier {
    pub sent: RwLock<Vec<(String, String)>>,
    pub fail: RwLock<bool>,
}

#[allow(dead_code)]
impl MockNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    pub fn sent_to(&self, phone_number: &str) -> Vec<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .filter(|(phone, _)| phone == phone_number)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, phone_number: &str, message: &str) -> Result<(), NotifierError> {
        if *self.fail.read().unwrap() {
            return Err(NotifierError::GatewayError {
                status: 500,
                body: "mock gateway failure".to_string(),
            });
        }
        self.sent
            .write()
            .unwrap()
            .push((phone_number.to_string(), message.to_string()));
        Ok(())
    }
}
