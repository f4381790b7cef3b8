use super::*;
use sw_db::{DatabaseCore, DuckDbBackend};

async fn platform_db() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL);
         CREATE TABLE properties (id INTEGER, name TEXT);
         INSERT INTO users VALUES (1, 'host@example.com');",
    )
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn test_table_exists() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    assert!(inspector.table_exists(&TableName::new("users")).await.unwrap());
    assert!(!inspector.table_exists(&TableName::new("tasks")).await.unwrap());
}

#[tokio::test]
async fn test_column_exists_and_type() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    let properties = TableName::new("properties");

    assert!(inspector.column_exists(&properties, "name").await.unwrap());
    assert!(!inspector.column_exists(&properties, "ical_url").await.unwrap());
    assert_eq!(
        inspector.column_type(&properties, "id").await.unwrap().as_deref(),
        Some("INTEGER")
    );
}

#[tokio::test]
async fn test_column_exists_on_missing_table() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    assert!(!inspector
        .column_exists(&TableName::new("tasks"), "id")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_answers_are_not_cached() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    let tasks = TableName::new("tasks");

    assert!(!inspector.table_exists(&tasks).await.unwrap());
    db.execute_batch("CREATE TABLE tasks (id INTEGER)").await.unwrap();
    assert!(inspector.table_exists(&tasks).await.unwrap());
}

#[tokio::test]
async fn test_row_exists() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    let users = TableName::new("users");
    assert!(inspector.row_exists(&users, "\"id\" = 1").await.unwrap());
    assert!(!inspector.row_exists(&users, "\"id\" = 2").await.unwrap());
}

#[tokio::test]
async fn test_row_count() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    assert_eq!(inspector.row_count(&TableName::new("users")).await.unwrap(), 1);
    assert_eq!(inspector.row_count(&TableName::new("properties")).await.unwrap(), 0);

    let err = inspector
        .row_count(&TableName::new("invoices"))
        .await
        .unwrap_err();
    assert!(matches!(err, StepError::InspectionFailure(ref msg) if msg.contains("row count for invoices")));
}

#[tokio::test]
async fn test_row_lookup_error_is_inspection_failure() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    let err = inspector
        .row_exists(&TableName::new("users"), "no_such_column = 1")
        .await
        .unwrap_err();
    assert!(matches!(err, StepError::InspectionFailure(ref msg) if msg.contains("users")));
}

#[tokio::test]
async fn test_snapshot() {
    let db = platform_db().await;
    let inspector = SchemaInspector::new(&db);
    let snapshot = inspector
        .snapshot(&[
            TableName::new("users"),
            TableName::new("tasks"),
            TableName::new("properties"),
        ])
        .await
        .unwrap();

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.has_table("USERS"));
    assert!(!snapshot.has_table("tasks"));
    assert_eq!(snapshot.column_type("users", "email"), Some("VARCHAR"));
    assert_eq!(snapshot.column_type("users", "missing"), None);

    let names: Vec<&str> = snapshot.tables().map(|(t, _)| t.as_str()).collect();
    assert_eq!(names, vec!["properties", "users"]);
}
