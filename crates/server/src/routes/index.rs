use axum::response::Html;
use chrono::Utc;
use shared::{
    api::error::{Nothing, ServerError},
    model::{Owner, ProgressStore},
};

use crate::{db::DatabaseConnection, pages, ProgressRules, UserState};

pub async fn index(
    DatabaseConnection(conn): DatabaseConnection,
    rules: ProgressRules,
    user_state: Option<UserState>,
) -> Result<Html<String>, ServerError<Nothing>> {
    let owner = Owner::from(user_state.as_ref().map(|u| u.id));
    let state = conn.interact(move |conn| conn.load(owner)).await??;
    let status = state.status(Utc::now(), rules.goal);

    Ok(Html(pages::index(user_state.as_ref(), &status, rules.goal)))
}
