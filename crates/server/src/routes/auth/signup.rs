use axum::{
    response::{Html, Redirect},
    Form,
};
use chrono::Utc;
use shared::{
    api::{error::ServerError, response_errors::SignupError, Page},
    model::{NewUser, SignupUser, ValidateModel},
};
use tracing::info;

use crate::{db::DatabaseConnection, pages, password::hash_password, SessionValue};

pub async fn signup_page() -> Html<String> {
    Html(pages::signup_form())
}

pub async fn signup(
    DatabaseConnection(conn): DatabaseConnection,
    mut session: SessionValue,
    Form(signup_user): Form<SignupUser>,
) -> Result<Redirect, ServerError<SignupError>> {
    let signup_user = signup_user.trimmed();
    signup_user.validate()?;

    let user = conn
        .interact(move |conn| {
            // Hashing is slow so it happens here, off the async runtime
            let password_hash = hash_password(&signup_user.password)?;
            let new_user = NewUser::new(
                signup_user.username,
                signup_user.email,
                password_hash,
                Utc::now(),
            );

            new_user.create(conn)
        })
        .await??;

    info!(id = user.id, username = %user.username, "Signed up");

    // New accounts are logged straight in
    session.set_user_state(&user).await?;

    Ok(Redirect::to(Page::Index.path()))
}
