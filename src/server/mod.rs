mod handlers;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{API, DynAPI};
use crate::server::handlers::{places, users};

pub async fn serve<T: API + Sync + Send + 'static>(api: T) {
    tracing_subscriber::fmt::init();

    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/auth/signup", post(users::signup))
        .route("/auth/login", post(users::login))
        .route("/users", get(users::list))
        .route("/users/:id/places", get(places::find_by_creator))
        .route("/places", post(places::create))
        .route(
            "/places/:id",
            get(places::find)
                .patch(places::update)
                .delete(places::delete),
        )
        .layer(Extension(api));

    let port = env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5000);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
