use axum::response::Redirect;
use shared::api::{
    error::{Nothing, ServerError},
    Page,
};

use crate::SessionValue;

pub async fn logout(mut session: SessionValue) -> Result<Redirect, ServerError<Nothing>> {
    session.clear().await?;
    Ok(Redirect::to(Page::Index.path()))
}
