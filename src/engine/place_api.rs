use super::{store, Database, Engine};

use async_trait::async_trait;
use sqlx::{Acquire, Transaction};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    api::PlaceAPI,
    auth::{Platform, Subject},
    entities::{Place, PlaceChanges, PlaceDraft},
    error::Error,
    external::locationiq,
};

// An atomic unit's writes are bounded; expiry drops the transaction, which
// rolls it back.
const ATOMIC_UNIT_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
impl PlaceAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_place(&self, id: Uuid) -> Result<Place, Error> {
        let mut conn = self.pool.acquire().await?;

        store::fetch_place(&mut conn, &id)
            .await?
            .ok_or_else(|| Error::not_found_error("Could not find place for the provided id."))
    }

    #[tracing::instrument(skip(self))]
    async fn find_places_by_creator(&self, creator_id: Uuid) -> Result<Vec<Place>, Error> {
        let mut conn = self.pool.acquire().await?;

        let places = store::fetch_places_by_creator(&mut conn, &creator_id).await?;

        if places.is_empty() {
            return Err(Error::not_found_error(
                "Could not find places for the provided user id.",
            ));
        }

        Ok(places)
    }

    #[tracing::instrument(skip(self))]
    async fn create_place(&self, subject: Subject, draft: PlaceDraft) -> Result<Place, Error> {
        self.authorize(subject.clone(), "create_place", Platform::default())?;

        draft.validate()?;

        let mut conn = self.pool.acquire().await?;

        store::fetch_user(&mut conn, &subject.id)
            .await?
            .ok_or_else(Error::creator_not_found_error)?;

        // geocoding happens before any write, so adapter failures abort with
        // nothing to undo
        let location = locationiq::resolve(&draft.address).await?;

        let place = Place::new(draft, location, subject.id);

        let unit = async {
            let mut tx = conn.begin().await?;

            let mut creator = store::fetch_user_for_update(&mut tx, &place.creator_id)
                .await?
                .ok_or_else(Error::creator_not_found_error)?;

            store::insert_place(&mut tx, &place).await?;

            creator.places.push(place.id);
            store::update_user(&mut tx, &creator).await?;

            Ok(tx)
        };

        if let Err(err) = bounded(unit).await {
            // nothing will reference the uploaded file anymore
            remove_upload(place.image.clone());

            if err.is_creator_not_found_error() {
                return Err(err);
            }

            tracing::error!(%err, "create place atomic unit failed");

            return Err(Error::persistence_error(
                "Creating place failed, please try again.",
            ));
        }

        Ok(place)
    }

    #[tracing::instrument(skip(self))]
    async fn update_place(
        &self,
        subject: Subject,
        id: Uuid,
        changes: PlaceChanges,
    ) -> Result<Place, Error> {
        changes.validate()?;

        let mut conn = self.pool.acquire().await?;

        let mut place = store::fetch_place(&mut conn, &id)
            .await?
            .ok_or_else(|| Error::not_found_error("Could not find place for the provided id."))?;

        self.authorize(subject, "update", place.clone())?;

        place.title = changes.title;
        place.description = changes.description;

        store::update_place(&mut conn, &place).await.map_err(|err| {
            tracing::error!(%err, "updating place failed");
            Error::persistence_error("Something went wrong, could not update place.")
        })?;

        Ok(place)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_place(&self, subject: Subject, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await.map_err(|err| {
            tracing::error!(%err, "acquiring a connection failed");
            Error::persistence_error("Something went wrong, could not delete place.")
        })?;

        let place = store::fetch_place(&mut conn, &id)
            .await
            .map_err(|err| {
                tracing::error!(%err, "place lookup failed");
                Error::persistence_error("Something went wrong, could not delete place.")
            })?
            .ok_or_else(|| Error::not_found_error("Could not find place for the provided id."))?;

        self.authorize(subject, "delete", place.clone())?;

        let unit = async {
            let mut tx = conn.begin().await?;

            // a concurrent delete may have won the race since the unlocked read
            let place = store::fetch_place_for_update(&mut tx, &id)
                .await?
                .ok_or_else(|| {
                    Error::not_found_error("Could not find place for the provided id.")
                })?;

            let mut creator = store::fetch_user_for_update(&mut tx, &place.creator_id)
                .await?
                .ok_or_else(Error::creator_not_found_error)?;

            store::delete_place(&mut tx, &place.id).await?;

            creator.places.retain(|place_id| place_id != &place.id);
            store::update_user(&mut tx, &creator).await?;

            Ok(tx)
        };

        match bounded(unit).await {
            Ok(()) => {}
            Err(err) if err.is_not_found_error() => return Err(err),
            Err(err) => {
                tracing::error!(%err, "delete place atomic unit failed");

                return Err(Error::persistence_error(
                    "Something went wrong, could not delete place.",
                ));
            }
        }

        remove_upload(place.image);

        Ok(())
    }
}

// The timeout covers the unit's writes only; the commit runs untimed
// afterwards, so a timed-out unit can never have sent COMMIT and the
// rollback-on-drop outcome is unambiguous.
async fn bounded<'c, F>(unit: F) -> Result<(), Error>
where
    F: Future<Output = Result<Transaction<'c, Database>, Error>>,
{
    let tx = match tokio::time::timeout(ATOMIC_UNIT_TIMEOUT, unit).await {
        Ok(result) => result?,
        Err(_) => return Err(Error::database_error("atomic unit timed out")),
    };

    Ok(tx.commit().await?)
}

// Best-effort compensation: the primary response never waits on, or fails
// because of, file removal.
fn remove_upload(path: String) {
    tokio::spawn(async move {
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(%path, %err, "failed to remove uploaded file");
        }
    });
}

#[tokio::test]
async fn a_stalled_atomic_unit_times_out_without_committing() {
    let unit = std::future::pending::<Result<Transaction<'static, Database>, Error>>();

    let err = bounded(unit).await.unwrap_err();

    assert!(err.message.contains("timed out"));
}

#[tokio::test]
async fn atomic_unit_failures_propagate_before_any_commit() {
    let unit = async { Err::<Transaction<'static, Database>, Error>(Error::creator_not_found_error()) };

    let err = bounded(unit).await.unwrap_err();

    assert!(err.is_creator_not_found_error());
}
