use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
use {
    crate::{
        api::{
            error::{ServerError, ServerErrorContext},
            response_errors::SignupError,
        },
        model::User,
    },
    exemplar::Model,
    rusqlite::{Connection, TransactionBehavior},
    tracing::instrument,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("users"))]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new<U: Into<String>, E: Into<String>>(
        username: U,
        email: E,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash,
            is_staff: false,
            is_active: true,
            created_at,
        }
    }
}

#[cfg(feature = "backend")]
impl NewUser {
    /// Inserts the user unless the username or email is already taken, in
    /// which case nothing is written
    #[instrument(skip_all, fields(username = %self.username))]
    pub fn create(self, conn: &mut Connection) -> Result<User, ServerError<SignupError>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if User::fetch_by_username(&tx, &self.username)?.is_some() {
            return Err(SignupError::UsernameUnavailable.into());
        }

        if User::fetch_by_email(&tx, &self.email)?.is_some() {
            return Err(SignupError::EmailUnavailable.into());
        }

        let user = {
            self.insert(&tx)
                .map_err(ServerError::<SignupError>::from)
                .context("NewUser::insert")?;
            User::fetch_by_id(&tx, tx.last_insert_rowid())?
        };

        tx.commit()?;

        Ok(user)
    }
}
