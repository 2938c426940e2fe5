use sqlx::{types::Json, Executor, PgConnection, Row};
use uuid::Uuid;

use crate::{
    entities::{Place, User},
    error::Error,
};

// Every function takes `&mut PgConnection`, so the same contract serves a
// plain pooled connection and a transaction participating in an atomic unit.

#[tracing::instrument(skip(conn))]
pub async fn fetch_place(conn: &mut PgConnection, id: &Uuid) -> Result<Option<Place>, Error> {
    let maybe_row = conn
        .fetch_optional(sqlx::query("SELECT data FROM places WHERE id = $1").bind(id))
        .await?;

    match maybe_row {
        Some(row) => {
            let Json(place): Json<Place> = row.try_get("data")?;
            Ok(Some(place))
        }
        None => Ok(None),
    }
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_place_for_update(
    conn: &mut PgConnection,
    id: &Uuid,
) -> Result<Option<Place>, Error> {
    let maybe_row = conn
        .fetch_optional(sqlx::query("SELECT data FROM places WHERE id = $1 FOR UPDATE").bind(id))
        .await?;

    match maybe_row {
        Some(row) => {
            let Json(place): Json<Place> = row.try_get("data")?;
            Ok(Some(place))
        }
        None => Ok(None),
    }
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_places_by_creator(
    conn: &mut PgConnection,
    creator_id: &Uuid,
) -> Result<Vec<Place>, Error> {
    let rows = conn
        .fetch_all(sqlx::query("SELECT data FROM places WHERE creator_id = $1").bind(creator_id))
        .await?;

    let mut places = Vec::with_capacity(rows.len());

    for row in rows {
        let Json(place): Json<Place> = row.try_get("data")?;
        places.push(place);
    }

    Ok(places)
}

#[tracing::instrument(skip(conn, place))]
pub async fn insert_place(conn: &mut PgConnection, place: &Place) -> Result<(), Error> {
    conn.execute(
        sqlx::query("INSERT INTO places (id, creator_id, data) VALUES ($1, $2, $3)")
            .bind(&place.id)
            .bind(&place.creator_id)
            .bind(Json(place)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn, place))]
pub async fn update_place(conn: &mut PgConnection, place: &Place) -> Result<(), Error> {
    conn.execute(
        sqlx::query("UPDATE places SET data = $2 WHERE id = $1")
            .bind(&place.id)
            .bind(Json(place)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn delete_place(conn: &mut PgConnection, id: &Uuid) -> Result<(), Error> {
    conn.execute(sqlx::query("DELETE FROM places WHERE id = $1").bind(id))
        .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_user(conn: &mut PgConnection, id: &Uuid) -> Result<Option<User>, Error> {
    let maybe_row = conn
        .fetch_optional(sqlx::query("SELECT data FROM users WHERE id = $1").bind(id))
        .await?;

    match maybe_row {
        Some(row) => {
            let Json(user): Json<User> = row.try_get("data")?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_user_for_update(
    conn: &mut PgConnection,
    id: &Uuid,
) -> Result<Option<User>, Error> {
    let maybe_row = conn
        .fetch_optional(sqlx::query("SELECT data FROM users WHERE id = $1 FOR UPDATE").bind(id))
        .await?;

    match maybe_row {
        Some(row) => {
            let Json(user): Json<User> = row.try_get("data")?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Looks an account up by email, returning the document together with the
/// stored password hash for the credential check.
#[tracing::instrument(skip(conn))]
pub async fn fetch_user_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<(User, String)>, Error> {
    let maybe_row = conn
        .fetch_optional(
            sqlx::query("SELECT data, password_hash FROM users WHERE email = $1").bind(email),
        )
        .await?;

    match maybe_row {
        Some(row) => {
            let Json(user): Json<User> = row.try_get("data")?;
            let password_hash: String = row.try_get("password_hash")?;
            Ok(Some((user, password_hash)))
        }
        None => Ok(None),
    }
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_users(conn: &mut PgConnection) -> Result<Vec<User>, Error> {
    let rows = conn.fetch_all(sqlx::query("SELECT data FROM users")).await?;

    let mut users = Vec::with_capacity(rows.len());

    for row in rows {
        let Json(user): Json<User> = row.try_get("data")?;
        users.push(user);
    }

    Ok(users)
}

// The UNIQUE constraint on email backstops the signup pre-check; a lost race
// surfaces the same "exists already" failure as the pre-check.
#[tracing::instrument(skip(conn, user, password_hash))]
pub async fn insert_user(
    conn: &mut PgConnection,
    user: &User,
    password_hash: &str,
) -> Result<(), Error> {
    let result = conn
        .execute(
            sqlx::query("INSERT INTO users (id, email, password_hash, data) VALUES ($1, $2, $3, $4)")
                .bind(&user.id)
                .bind(&user.email)
                .bind(password_hash)
                .bind(Json(user)),
        )
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some("23505") => {
            Err(Error::email_taken_error())
        }
        Err(err) => Err(err.into()),
    }
}

#[tracing::instrument(skip(conn, user))]
pub async fn update_user(conn: &mut PgConnection, user: &User) -> Result<(), Error> {
    conn.execute(
        sqlx::query("UPDATE users SET data = $2 WHERE id = $1")
            .bind(&user.id)
            .bind(Json(user)),
    )
    .await?;

    Ok(())
}
