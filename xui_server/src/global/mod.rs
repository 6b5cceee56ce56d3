use crate::global::logger::init_logger;
use crate::orm_entity::{inbound, user};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;

pub mod config;
pub mod logger;
pub mod manager;
pub mod opts;

pub(crate) async fn init_global(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    init_logger()?;

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info);

    let db = Database::connect(opt).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// 按当前数据库类型建表
pub(crate) async fn create_tables(db: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(schema.create_table_from_entity(user::Entity).if_not_exists()))
        .await?;
    db.execute(backend.build(schema.create_table_from_entity(inbound::Entity).if_not_exists()))
        .await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_database() -> DatabaseConnection {
    // 内存库每个连接都是独立的, 只能保留一个连接
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    create_tables(&db).await.unwrap();
    db
}
