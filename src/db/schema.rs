use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::db::entities::prelude::*;

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Creates any missing tables from the entity definitions.
///
/// Tables are created parents first so foreign keys resolve on PostgreSQL.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, LocalAuthority).await?;
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Location).await?;
    create_table(db, &schema, WaterQualityData).await?;
    create_table(db, &schema, Alert).await?;
    create_table(db, &schema, PosterTemplate).await?;
    create_table(db, &schema, Poster).await?;
    create_table(db, &schema, PosterSection).await?;
    create_table(db, &schema, Device).await?;
    create_table(db, &schema, DeviceLocation).await?;
    create_table(db, &schema, DeviceToken).await?;
    create_table(db, &schema, AuditLog).await?;

    info!("Database schema is up to date.");
    Ok(())
}
