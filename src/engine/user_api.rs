use super::store;
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::UserAPI,
    auth::{credentials, token, Grant},
    entities::{User, UserDraft},
    error::Error,
};

#[async_trait]
impl UserAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let mut conn = self.pool.acquire().await?;

        store::fetch_users(&mut conn).await
    }

    // `UserDraft` has a redacting Debug, so instrumenting the draft is safe.
    #[tracing::instrument(skip(self))]
    async fn signup(&self, draft: UserDraft) -> Result<Grant, Error> {
        draft.validate()?;

        let mut conn = self.pool.acquire().await?;

        if store::fetch_user_by_email(&mut conn, &draft.email)
            .await?
            .is_some()
        {
            return Err(Error::email_taken_error());
        }

        let password_hash = credentials::hash_password(&draft.password)?;
        let user = User::new(draft.name, draft.email, draft.image);

        store::insert_user(&mut conn, &user, &password_hash).await?;

        let token = token::issue(user.id, &user.email)?;

        Ok(Grant {
            user_id: user.id,
            email: user.email,
            token,
        })
    }

    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: String, password: String) -> Result<Grant, Error> {
        let mut conn = self.pool.acquire().await?;

        // an unknown email and a wrong password are indistinguishable
        let (user, password_hash) = store::fetch_user_by_email(&mut conn, &email)
            .await?
            .ok_or_else(Error::invalid_credentials_error)?;

        if !credentials::verify_password(&password, &password_hash) {
            return Err(Error::invalid_credentials_error());
        }

        let token = token::issue(user.id, &user.email)?;

        Ok(Grant {
            user_id: user.id,
            email: user.email,
            token,
        })
    }
}
