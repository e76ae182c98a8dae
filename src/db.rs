//! Database connection and schema bootstrap.

use crate::app_config::DatabaseConfig;
use crate::orm::{answers, questions, responses, surveys, users};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

/// Opens a connection pool for the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());
    opt.max_connections(config.max_connections.max(1));

    let db = Database::connect(opt).await?;
    log::info!("Connected to database ({:?})", db.get_database_backend());
    Ok(db)
}

/// Creates every table that does not exist yet, parents before children.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, surveys::Entity).await?;
    create_table(db, questions::Entity).await?;
    create_table(db, responses::Entity).await?;
    create_table(db, answers::Entity).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    log::debug!("Ensured table {}", entity.table_name());
    Ok(())
}
