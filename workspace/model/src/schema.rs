//! Schema bootstrap.
//!
//! There is no versioned migration history: the three tables are derived
//! straight from the entity definitions and created when missing.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};
use tracing::{debug, info, instrument};

use crate::entities::{car, reservation, user};

/// Create the `users`, `cars` and `reservations` tables if they do not exist yet.
///
/// Tables are created parents-first so the reservation foreign keys resolve.
#[instrument(skip(db))]
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, car::Entity).await?;
    create_table(db, reservation::Entity).await?;
    info!("Database schema is ready");
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    debug!("Creating table {}", entity.table_name());
    db.execute(backend.build(&statement)).await?;
    Ok(())
}
