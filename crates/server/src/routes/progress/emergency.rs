use axum::{response::Html, Form, Json};
use chrono::Utc;
use shared::{
    api::error::{Nothing, ServerError},
    model::{ExtendEmergencyForm, ExtendEmergencyResponse, Owner, Progress},
};

use crate::{db::DatabaseConnection, pages, ProgressRules, UserState};

/// Starts a new countdown, replacing any that is already running
pub async fn start_emergency(
    DatabaseConnection(conn): DatabaseConnection,
    rules: ProgressRules,
    user_state: Option<UserState>,
) -> Result<Html<&'static str>, ServerError<Nothing>> {
    let owner = Owner::from(user_state.map(|u| u.id));

    conn.interact(move |conn| Progress::start_emergency(conn, owner, &rules, Utc::now()))
        .await??;

    Ok(Html(pages::EMERGENCY_STARTED))
}

/// Restarts the countdown if the passcode matches. A wrong passcode isn't an
/// error, it's reported as `{"ok": false}`
pub async fn extend_emergency(
    DatabaseConnection(conn): DatabaseConnection,
    rules: ProgressRules,
    user_state: Option<UserState>,
    form: Option<Form<ExtendEmergencyForm>>,
) -> Result<Json<ExtendEmergencyResponse>, ServerError<Nothing>> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let owner = Owner::from(user_state.map(|u| u.id));

    let ok = conn
        .interact(move |conn| {
            Progress::extend_emergency(conn, owner, &form.code, &rules, Utc::now())
        })
        .await??;

    Ok(Json(ExtendEmergencyResponse { ok }))
}
