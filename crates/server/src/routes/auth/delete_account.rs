use axum::response::Redirect;
use shared::{
    api::{
        error::{Nothing, ServerError},
        Page,
    },
    model::User,
};
use tracing::info;

use crate::{db::DatabaseConnection, SessionValue, UserState};

/// Deletes the logged in user along with their history and progress, then
/// ends the session
pub async fn delete_account(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    mut session: SessionValue,
) -> Result<Redirect, ServerError<Nothing>> {
    let id = user_state.id;
    let deleted = conn.interact(move |conn| User::delete(conn, id)).await??;

    info!(id, deleted, "Deleted account");

    session.clear().await?;

    Ok(Redirect::to(Page::Index.path()))
}
