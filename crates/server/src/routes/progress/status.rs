use axum::Json;
use chrono::Utc;
use shared::{
    api::error::{Nothing, ServerError},
    model::{Owner, ProgressStore, Status},
};

use crate::{db::DatabaseConnection, ProgressRules, UserState};

pub async fn status(
    DatabaseConnection(conn): DatabaseConnection,
    rules: ProgressRules,
    user_state: Option<UserState>,
) -> Result<Json<Status>, ServerError<Nothing>> {
    let owner = Owner::from(user_state.map(|u| u.id));
    let state = conn.interact(move |conn| conn.load(owner)).await??;

    Ok(Json(state.status(Utc::now(), rules.goal)))
}
