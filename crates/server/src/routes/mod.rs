use axum::{
    routing::{get, post},
    Router,
};
use shared::api::{Object, Page};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tower_sessions::{cookie::time::Duration, Expiry, SessionManagerLayer};
use tracing::Level;

use crate::{session_store::SqliteSessionStore, AppState};

mod index;
pub use index::*;

mod ping;
pub use ping::*;

pub mod auth;
pub mod progress;

/// Builds the full application. Anything that doesn't match a route is looked
/// up in the assets directory
pub fn router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(SqliteSessionStore::new(state.pool.clone()))
        .with_secure(state.args.secure_sessions)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            state.args.session_expiry_days,
        )));

    Router::new()
        .route(Page::Index.path(), get(index))
        .route(
            Page::Signup.path(),
            get(auth::signup_page).post(auth::signup),
        )
        .route(Page::Login.path(), get(auth::login_page).post(auth::login))
        .route(Page::Logout.path(), post(auth::logout))
        .route(Page::DeleteAccount.path(), post(auth::delete_account))
        .route(Object::Status.path(), get(progress::status))
        .route(Object::LogPushups.path(), post(progress::log_pushups))
        .route(Object::StartEmergency.path(), post(progress::start_emergency))
        .route(Object::ExtendEmergency.path(), post(progress::extend_emergency))
        .route(Object::History.path(), get(progress::history))
        .route(Object::Ping.path(), get(ping))
        .fallback_service(ServeDir::new(&state.args.assets_dir))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
