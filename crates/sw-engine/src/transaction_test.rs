use super::*;
use async_trait::async_trait;
use sw_core::{ColumnDef, FailureKind};
use sw_db::{
    ColumnInfo, DatabaseCore, DatabaseSchema, DatabaseTransaction, DbError, DbResult,
    DuckDbBackend,
};

fn create_settings() -> MigrationStep {
    MigrationStep::create_table(
        "create_settings",
        "settings",
        vec![ColumnDef::new("key", "TEXT"), ColumnDef::new("value", "TEXT")],
    )
    .in_group("settings")
}

fn seed_timezone() -> MigrationStep {
    MigrationStep::seed_row(
        "seed_timezone",
        "settings",
        [("key", "timezone"), ("value", "UTC")],
        &["key"],
    )
    .in_group("settings")
}

fn broken_seed() -> MigrationStep {
    MigrationStep::seed_row(
        "seed_broken",
        "settings",
        [("key", "locale"), ("no_such_column", "x")],
        &["key"],
    )
    .in_group("settings")
}

fn kinds(outcomes: &[ScopeOutcome<'_>]) -> Vec<Option<FailureKind>> {
    outcomes
        .iter()
        .map(|o| o.result.as_ref().err().map(StepError::kind))
        .collect()
}

#[tokio::test]
async fn test_scope_commits_on_success() {
    let db = DuckDbBackend::in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&db);
    let (create, seed) = (create_settings(), seed_timezone());

    let outcomes = coordinator.run_scope(&[&create, &seed]).await;
    assert_eq!(kinds(&outcomes), vec![None, None]);
    assert!(outcomes
        .iter()
        .all(|o| o.result.as_ref().unwrap().outcome == Outcome::Applied));
    assert!(db.row_exists("settings", "\"key\" = 'timezone'").await.unwrap());
}

#[tokio::test]
async fn test_group_failure_rolls_back_everything() {
    let db = DuckDbBackend::in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&db);
    let (create, broken, seed) = (create_settings(), broken_seed(), seed_timezone());

    let outcomes = coordinator.run_scope(&[&create, &broken, &seed]).await;
    assert_eq!(
        kinds(&outcomes),
        vec![
            Some(FailureKind::RolledBack),
            Some(FailureKind::ApplyFailure),
            Some(FailureKind::RolledBack),
        ]
    );
    let first = outcomes[0].result.as_ref().unwrap_err().to_string();
    assert!(first.contains("undone because step 'seed_broken' failed"));
    let last = outcomes[2].result.as_ref().unwrap_err().to_string();
    assert!(last.contains("not attempted"));
    assert!(!db.table_exists("settings").await.unwrap());
}

#[tokio::test]
async fn test_group_rerun_after_fix_applies_everything() {
    let db = DuckDbBackend::in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&db);
    let (create, broken, seed) = (create_settings(), broken_seed(), seed_timezone());

    coordinator.run_scope(&[&create, &broken]).await;
    let outcomes = coordinator.run_scope(&[&create, &seed]).await;
    assert!(outcomes
        .iter()
        .all(|o| matches!(&o.result, Ok(r) if r.outcome == Outcome::Applied)));
}

#[tokio::test]
async fn test_skipped_member_stays_skipped_on_rollback() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE settings (key TEXT, value TEXT)")
        .await
        .unwrap();
    let coordinator = TransactionCoordinator::new(&db);
    let (create, broken) = (create_settings(), broken_seed());

    let outcomes = coordinator.run_scope(&[&create, &broken]).await;
    assert!(matches!(&outcomes[0].result, Ok(r) if r.outcome == Outcome::Skipped));
    assert_eq!(kinds(&outcomes)[1], Some(FailureKind::ApplyFailure));
    assert!(db.table_exists("settings").await.unwrap());
}

#[tokio::test]
async fn test_single_step_failure_leaves_no_open_transaction() {
    let db = DuckDbBackend::in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&db);
    let seed = seed_timezone();

    let outcomes = coordinator.run_scope(&[&seed]).await;
    assert_eq!(kinds(&outcomes), vec![Some(FailureKind::MissingPrerequisite)]);

    // A fresh transaction can be opened, so the failed scope was closed.
    db.begin().await.unwrap();
    db.rollback().await.unwrap();
}

/// Delegates to DuckDB but refuses to commit.
struct CommitRefused(DuckDbBackend);

#[async_trait]
impl DatabaseCore for CommitRefused {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.0.execute(sql).await
    }
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.0.execute_batch(sql).await
    }
    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.0.query_count(sql).await
    }
    fn db_type(&self) -> &'static str {
        "commit_refused"
    }
}

#[async_trait]
impl DatabaseTransaction for CommitRefused {
    async fn begin(&self) -> DbResult<()> {
        self.0.begin().await
    }
    async fn commit(&self) -> DbResult<()> {
        Err(DbError::TransactionError("disk full".into()))
    }
    async fn rollback(&self) -> DbResult<()> {
        self.0.rollback().await
    }
}

#[async_trait]
impl DatabaseSchema for CommitRefused {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        self.0.table_exists(table).await
    }
    async fn table_columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        self.0.table_columns(table).await
    }
    async fn column_type(&self, table: &str, column: &str) -> DbResult<Option<String>> {
        self.0.column_type(table, column).await
    }
    async fn row_exists(&self, table: &str, predicate: &str) -> DbResult<bool> {
        self.0.row_exists(table, predicate).await
    }
}

#[tokio::test]
async fn test_commit_failure_fails_applied_steps() {
    let db = CommitRefused(DuckDbBackend::in_memory().unwrap());
    let coordinator = TransactionCoordinator::new(&db);
    let (create, seed) = (create_settings(), seed_timezone());

    let outcomes = coordinator.run_scope(&[&create, &seed]).await;
    assert_eq!(
        kinds(&outcomes),
        vec![Some(FailureKind::ApplyFailure), Some(FailureKind::ApplyFailure)]
    );
    assert!(outcomes[0]
        .result
        .as_ref()
        .unwrap_err()
        .to_string()
        .contains("commit failed"));
    assert!(!db.table_exists("settings").await.unwrap());
}
