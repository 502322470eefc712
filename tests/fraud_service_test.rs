use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use safiri_guard::notifier::Notifier;
use safiri_guard::service::fraud_service::FraudService;
use safiri_guard::service::fraud_service::HIGH_VALUE_THRESHOLD;

mod common;

fn fraud_service(
    db: Arc<safiri_guard::repository::Repository>,
    mock: &Arc<common::MockNotifier>,
) -> FraudService {
    let notifier: Arc<dyn Notifier> = mock.clone();
    FraudService::new(db, notifier)
}

#[tokio::test]
async fn test_high_value_transaction_flags() {
    let (db, db_path) = common::setup_db().await;
    let mock = common::MockNotifier::new();
    let service = fraud_service(db.clone(), &mock);
    let phone = "+254711000001";

    let verdict = service
        .evaluate(phone, HIGH_VALUE_THRESHOLD + 1)
        .await
        .expect("Failed to evaluate");
    assert!(verdict.flagged);
    assert!(verdict.alert.as_ref().unwrap().contains("50001"));

    let alerts = db.alert.recent(phone, 3).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("50001"));

    assert_eq!(mock.sent_to(phone).len(), 1);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_threshold_amount_passes() {
    let (db, db_path) = common::setup_db().await;
    let mock = common::MockNotifier::new();
    let service = fraud_service(db.clone(), &mock);
    let phone = "+254711000002";

    // 50,000 sits exactly at the threshold and must not trip the
    // high-value signal on its own
    let verdict = service.evaluate(phone, HIGH_VALUE_THRESHOLD).await.unwrap();
    assert!(!verdict.flagged);
    assert!(verdict.alert.is_none());

    assert!(db.alert.recent(phone, 3).await.unwrap().is_empty());
    assert_eq!(mock.sent_count(), 0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_recent_sim_swap_flags_small_amount() {
    let (db, db_path) = common::setup_db().await;
    let mock = common::MockNotifier::new();
    let service = fraud_service(db.clone(), &mock);
    let phone = "+254711000003";

    db.sim_swap
        .insert(phone, Utc::now() - Duration::hours(1))
        .await
        .expect("Failed to insert sim swap");

    let verdict = service.evaluate(phone, 100).await.unwrap();
    assert!(verdict.flagged);

    let alerts = db.alert.recent(phone, 3).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("100"));

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_stale_sim_swap_is_ignored() {
    let (db, db_path) = common::setup_db().await;
    let mock = common::MockNotifier::new();
    let service = fraud_service(db.clone(), &mock);
    let phone = "+254711000004";

    db.sim_swap
        .insert(phone, Utc::now() - Duration::hours(25))
        .await
        .expect("Failed to insert sim swap");

    let verdict = service.evaluate(phone, 100).await.unwrap();
    assert!(!verdict.flagged);
    assert!(db.alert.recent(phone, 3).await.unwrap().is_empty());
    assert_eq!(mock.sent_count(), 0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_flagged_transaction_survives_notifier_failure() {
    let (db, db_path) = common::setup_db().await;
    let mock = common::MockNotifier::new();
    let service = fraud_service(db.clone(), &mock);
    let phone = "+254711000005";

    mock.set_fail(true);
    let verdict = service.evaluate(phone, 60_000).await.unwrap();
    assert!(verdict.flagged);

    // The alert was still recorded
    let alerts = db.alert.recent(phone, 3).await.unwrap();
    assert_eq!(alerts.len(), 1);

    common::teardown_db(db_path).await;
}
