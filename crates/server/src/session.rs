use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::Utc;
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use shared::{
    api::error::{Nothing, ServerError},
    model::User,
    other_error, unauthorized_error,
};
use tower_sessions::Session;
use tracing::info;

/// The logged in user, as stored in the session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserState {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserState {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct SessionData {
    user_state: Option<UserState>,
}

#[derive(Debug, Clone)]
pub struct SessionValue {
    session: Session,
    data: SessionData,
}

impl SessionValue {
    const SESSION_DATA_KEY: &'static str = "session.data";

    /// Logs the user in. The session id is rotated first so an id set before
    /// login can't be used to ride the logged in session
    pub async fn set_user_state(&mut self, user: &User) -> Result<(), anyhow::Error> {
        self.session.cycle_id().await?;
        self.data.user_state = Some(user.into());
        Self::update_session(&self.session, &self.data).await?;
        Ok(())
    }

    /// Logs out by deleting the whole session
    pub async fn clear(&mut self) -> Result<(), anyhow::Error> {
        self.data = SessionData::default();
        self.session.flush().await?;
        Ok(())
    }

    async fn update_session(session: &Session, data: &SessionData) -> Result<(), anyhow::Error> {
        session.insert(Self::SESSION_DATA_KEY, data.clone()).await?;
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionValue
where
    S: Send + Sync,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(req: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(req, state)
            .await
            .map_err(|(code, message)| other_error!("Session unavailable ({code}): {message}"))?;

        let data: SessionData = session
            .get(Self::SESSION_DATA_KEY)
            .await
            .map_err(|e| other_error!("Failed to read session: {e:?}"))?
            .unwrap_or_default();

        Ok(Self { session, data })
    }
}

/// Rejects the request unless someone is logged in. Use `Option<UserState>`
/// for routes that also serve anonymous visitors
///
/// The user is looked up on every request. A session whose user has been
/// deleted, disabled or banned since logging in is flushed and treated as
/// logged out
#[async_trait]
impl<S> FromRequestParts<S> for UserState
where
    Pool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(req: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let mut session = SessionValue::from_request_parts(req, state).await?;

        let user_state = session
            .data
            .user_state
            .clone()
            .ok_or(unauthorized_error!("Not logged in"))?;

        let id = user_state.id;
        let user = Pool::from_ref(state)
            .get()
            .await?
            .interact(move |conn| User::fetch_by_id_maybe(conn, id))
            .await??;

        match user {
            Some(user) if user.can_log_in(Utc::now()) => Ok(user_state),
            _ => {
                info!(id, "Dropping session of a user that can no longer log in");
                session.clear().await?;
                Err(unauthorized_error!("Not logged in"))
            },
        }
    }
}
