use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::auth::Grant;
use crate::entities::{User, UserDraft};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct LoginParams {
    email: String,
    password: String,
}

pub async fn signup(
    Extension(api): Extension<DynAPI>,
    Json(draft): Json<UserDraft>,
) -> Result<(StatusCode, Json<Grant>), Error> {
    let grant = api.signup(draft).await?;

    Ok((StatusCode::CREATED, grant.into()))
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<Grant>, Error> {
    let grant = api.login(params.email, params.password).await?;

    Ok(grant.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<User>>, Error> {
    let users = api.list_users().await?;

    Ok(users.into())
}
