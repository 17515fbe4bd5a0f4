//! Integration tests for `AuditLogRepo`.

use agenda_core::audit::day_range_bounds;
use agenda_core::types::DbId;
use agenda_db::models::audit::CreateAuditLog;
use agenda_db::repositories::AuditLogRepo;
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

fn entry(record_id: DbId, action: &str) -> CreateAuditLog {
    CreateAuditLog {
        table_name: "appointments".to_string(),
        record_id,
        action: action.to_string(),
        old_values: Some(json!({ "status": "pending" })),
        new_values: Some(json!({ "status": "cancelled" })),
        changed_by: "12345678".to_string(),
        changed_by_type: "client".to_string(),
        reason: Some("sick".to_string()),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_round_trips_snapshots(pool: PgPool) {
    let record_id = DbId::new_v4();
    let log = AuditLogRepo::insert(&pool, &entry(record_id, "CANCEL"))
        .await
        .unwrap();

    assert_eq!(log.record_id, record_id);
    assert_eq!(log.action, "CANCEL");
    assert_eq!(log.old_values, Some(json!({ "status": "pending" })));
    assert_eq!(log.new_values, Some(json!({ "status": "cancelled" })));
    assert_eq!(log.reason.as_deref(), Some("sick"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_record_is_newest_first(pool: PgPool) {
    let record_id = DbId::new_v4();
    let first = AuditLogRepo::insert(&pool, &entry(record_id, "CREATE"))
        .await
        .unwrap();
    let second = AuditLogRepo::insert(&pool, &entry(record_id, "CANCEL"))
        .await
        .unwrap();
    AuditLogRepo::insert(&pool, &entry(DbId::new_v4(), "CANCEL"))
        .await
        .unwrap();

    let logs = AuditLogRepo::list_for_record(&pool, "appointments", record_id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].created_at >= logs[1].created_at);
    assert!(logs.iter().any(|l| l.id == first.id));
    assert!(logs.iter().any(|l| l.id == second.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_created_range(pool: PgPool) {
    let record_id = DbId::new_v4();
    AuditLogRepo::insert(&pool, &entry(record_id, "CANCEL"))
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let (from, to) = day_range_bounds(today, today).unwrap();
    let logs = AuditLogRepo::list_by_created_range(&pool, "appointments", from, to)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);

    let other_table = AuditLogRepo::list_by_created_range(&pool, "clients", from, to)
        .await
        .unwrap();
    assert!(other_table.is_empty());

    let yesterday = today.pred_opt().unwrap();
    let (from, to) = day_range_bounds(yesterday, yesterday).unwrap();
    let logs = AuditLogRepo::list_by_created_range(&pool, "appointments", from, to)
        .await
        .unwrap();
    assert!(logs.is_empty());
}
