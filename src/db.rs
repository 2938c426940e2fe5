use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;

pub struct PgPool(pub Pool<Postgres>);

impl PgPool {
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(db_uri)
            .await?;

        Ok(Self(pool))
    }
}
