use axum::{response::Html, Form};
use chrono::Utc;
use shared::{
    api::error::{Nothing, ServerError},
    model::{LogPushups, LogPushupsForm, Owner, Progress},
};

use crate::{db::DatabaseConnection, pages, UserState};

/// A missing or unreadable form logs nothing rather than failing
pub async fn log_pushups(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: Option<UserState>,
    form: Option<Form<LogPushupsForm>>,
) -> Result<Html<&'static str>, ServerError<Nothing>> {
    let LogPushups { amount } = form.map(|Form(form)| form).unwrap_or_default().into();
    let owner = Owner::from(user_state.map(|u| u.id));

    conn.interact(move |conn| Progress::log_pushups(conn, owner, amount, Utc::now()))
        .await??;

    Ok(Html(pages::LOGGED))
}
