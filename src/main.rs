use dotenv::dotenv;
use std::env;

use loci::db::PgPool;
use loci::engine::Engine;
use loci::server::serve;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let db_uri = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let PgPool(pool) = PgPool::new(&db_uri, 5).await.unwrap();

    let engine = Engine::new(pool).await.unwrap();

    serve(engine).await;
}
