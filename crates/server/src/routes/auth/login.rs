use axum::{
    response::{Html, Redirect},
    Form,
};
use chrono::Utc;
use shared::{
    api::{error::ServerError, response_errors::LoginError, Page},
    model::{LoginUser, User},
};
use tracing::{info, warn};

use crate::{
    db::DatabaseConnection,
    pages,
    password::{verify_dummy_password, verify_password},
    SessionValue,
};

pub async fn login_page() -> Html<String> {
    Html(pages::login_form())
}

pub async fn login(
    DatabaseConnection(conn): DatabaseConnection,
    mut session: SessionValue,
    Form(login_user): Form<LoginUser>,
) -> Result<Redirect, ServerError<LoginError>> {
    let user = conn
        .interact(move |conn| {
            let Some(user) = User::fetch_by_username(conn, login_user.username.trim())? else {
                verify_dummy_password(&login_user.password)?;
                return Err(ServerError::<LoginError>::from(LoginError::InvalidCredentials));
            };

            if !verify_password(&login_user.password, &user.password_hash)? {
                Err(LoginError::InvalidCredentials)?;
            }

            Ok::<_, ServerError<LoginError>>(user)
        })
        .await?
        .inspect_err(|e| warn!("Login failed: {e}"))?;

    if !user.is_active {
        Err(LoginError::AccountDisabled)?;
    }

    if let Some(until) = user.banned_until.filter(|_| user.is_banned(Utc::now())) {
        Err(LoginError::AccountBanned {
            until: until.format("%Y-%m-%d %H:%M UTC").to_string(),
        })?;
    }

    // Update the user state in the session so the user is logged in on future
    // requests
    session.set_user_state(&user).await?;
    info!(id = user.id, username = %user.username, "Logged in");

    Ok(Redirect::to(Page::Index.path()))
}
