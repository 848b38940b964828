use tracing::{error, info};

/// Close a SeaORM pool, logging the outcome under `name`
///
/// ```ignore
/// create_production_app(router, &config, timeout, close_postgres(db, "main")).await?;
/// ```
pub async fn close_postgres(db: sea_orm::DatabaseConnection, name: &str) {
    match db.close().await {
        Ok(_) => info!("PostgreSQL connection '{}' closed", name),
        Err(e) => error!("Error closing PostgreSQL connection '{}': {}", name, e),
    }
}
