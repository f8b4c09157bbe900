use axum::Json;
use shared::{
    api::error::{Nothing, ServerError},
    model::History,
};

use crate::{db::DatabaseConnection, UserState};

pub async fn history(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<History>, ServerError<Nothing>> {
    let history = conn
        .interact(move |conn| History::fetch(conn, user_state.id))
        .await??;

    Ok(Json(history))
}
