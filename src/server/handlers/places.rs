use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::auth::Subject;
use crate::entities::{Place, PlaceChanges, PlaceDraft};
use crate::error::Error;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    subject: Subject,
    Json(draft): Json<PlaceDraft>,
) -> Result<(StatusCode, Json<Place>), Error> {
    let place = api.create_place(subject, draft).await?;

    Ok((StatusCode::CREATED, place.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Place>, Error> {
    let place = api.find_place(id).await?;

    Ok(place.into())
}

pub async fn find_by_creator(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Place>>, Error> {
    let places = api.find_places_by_creator(id).await?;

    Ok(places.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    subject: Subject,
    Path(id): Path<Uuid>,
    Json(changes): Json<PlaceChanges>,
) -> Result<Json<Place>, Error> {
    let place = api.update_place(subject, id, changes).await?;

    Ok(place.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    subject: Subject,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Error> {
    api.delete_place(subject, id).await?;

    Ok(Json(json!({ "message": "Deleted place." })))
}
