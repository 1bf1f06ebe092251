//! Shared fixtures for the service tests.

use model::schema::create_tables;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

/// Create an in-memory SQLite database with the schema in place.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    create_tables(&db).await.expect("Failed to create tables");
    db
}

/// Make every `operation` (`INSERT` or `UPDATE`) on `table` abort.
pub async fn reject_writes(db: &DatabaseConnection, table: &str, operation: &str) {
    let sql = format!(
        "CREATE TRIGGER reject_{op}_{table} BEFORE {op} ON {table} \
         BEGIN SELECT RAISE(ABORT, 'writes rejected'); END;",
        op = operation,
        table = table,
    );
    db.execute_unprepared(&sql)
        .await
        .expect("Failed to install trigger");
}
