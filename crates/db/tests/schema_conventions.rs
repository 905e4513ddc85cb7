use sqlx::PgPool;

/// All `id` columns must be UUIDs.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_uuid(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 5, "expected five entity tables, got {rows:?}");
    for (table, data_type) in &rows {
        assert_eq!(data_type, "uuid", "Table {table}.id should be uuid, got {data_type}");
    }
}

/// Every table has created_at; every table except the append-only `alerts`
/// has updated_at. All of them are timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        let columns: &[&str] = if table == "alerts" {
            &["created_at"]
        } else {
            &["created_at", "updated_at"]
        };
        for col in columns {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// Every table with an updated_at column keeps it current through a trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_triggers_exist(pool: PgPool) {
    for table in ["users", "incidents", "tasks", "comments"] {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_table = $1
                  AND trigger_name = $2
            )",
        )
        .bind(table)
        .bind(format!("trg_{table}_updated_at"))
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "{table} should have an updated_at trigger");
    }
}

/// No character varying columns should exist; text columns use TEXT.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        rows.is_empty(),
        "Found VARCHAR columns (should use TEXT): {:?}",
        rows
    );
}

/// Every foreign key column must have a corresponding index.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT
             tc.table_name,
             kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fk_columns.is_empty());

    for (table, column) in &fk_columns {
        let (has_index,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1
                FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || ')%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index, "FK column {table}.{column} has no index");
    }
}

/// Foreign keys carry exactly the delete rules the data model requires.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fk_delete_rules(pool: PgPool) {
    let fk_rules: Vec<(String, String)> = sqlx::query_as(
        "SELECT rc.constraint_name, rc.delete_rule
         FROM information_schema.referential_constraints rc
         WHERE rc.constraint_schema = 'public'
         ORDER BY rc.constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let expected = [
        ("fk_alerts_acknowledged_by", "SET NULL"),
        ("fk_alerts_incident_id", "CASCADE"),
        ("fk_comments_incident_id", "CASCADE"),
        ("fk_comments_task_id", "CASCADE"),
        ("fk_comments_user_id", "CASCADE"),
        ("fk_incidents_assigned_to", "SET NULL"),
        ("fk_incidents_created_by", "CASCADE"),
        ("fk_tasks_assigned_to", "SET NULL"),
        ("fk_tasks_incident_id", "CASCADE"),
    ];

    let actual: Vec<(&str, &str)> = fk_rules
        .iter()
        .map(|(name, rule)| (name.as_str(), rule.as_str()))
        .collect();
    assert_eq!(actual, expected);
}

/// The comment target rule is a real check constraint, not application logic.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comment_check_constraint_declared(pool: PgPool) {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*)
         FROM information_schema.table_constraints
         WHERE table_name = 'comments'
           AND constraint_type = 'CHECK'
           AND constraint_name = 'ck_comments_target'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

/// users.email is protected by a named unique constraint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_unique_constraint_declared(pool: PgPool) {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*)
         FROM information_schema.table_constraints
         WHERE table_name = 'users'
           AND constraint_type = 'UNIQUE'
           AND constraint_name = $1",
    )
    .bind(incidentdesk_db::repositories::user_repo::EMAIL_UNIQUE_CONSTRAINT)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}
