use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{Grant, Subject};
use crate::entities::{Place, PlaceChanges, PlaceDraft, User, UserDraft};
use crate::error::Error;

#[async_trait]
pub trait PlaceAPI {
    async fn find_place(&self, id: Uuid) -> Result<Place, Error>;

    async fn find_places_by_creator(&self, creator_id: Uuid) -> Result<Vec<Place>, Error>;

    async fn create_place(&self, subject: Subject, draft: PlaceDraft) -> Result<Place, Error>;

    async fn update_place(
        &self,
        subject: Subject,
        id: Uuid,
        changes: PlaceChanges,
    ) -> Result<Place, Error>;

    async fn delete_place(&self, subject: Subject, id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait UserAPI {
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn signup(&self, draft: UserDraft) -> Result<Grant, Error>;

    async fn login(&self, email: String, password: String) -> Result<Grant, Error>;
}

pub trait API: PlaceAPI + UserAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
