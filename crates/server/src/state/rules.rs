use std::{ops::Deref, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use shared::{api::error::{Nothing, ServerError}, model::Rules};

/// Extractor for the goal, emergency duration and passcode in effect
#[derive(Debug, Clone)]
pub struct ProgressRules(Arc<Rules>);

impl From<Arc<Rules>> for ProgressRules {
    fn from(rules: Arc<Rules>) -> Self {
        ProgressRules(rules)
    }
}

impl Deref for ProgressRules {
    type Target = Rules;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProgressRules
where
    S: Send + Sync,
    Arc<Rules>: FromRef<S>,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(<Arc<Rules>>::from_ref(state).into())
    }
}
