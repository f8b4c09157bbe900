use std::sync::Arc;

use axum::extract::FromRef;
use deadpool_sqlite::Pool;
use shared::model::Rules;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: Pool,
    pub args: Arc<Cli>,
    pub rules: Arc<Rules>,
}

impl AppState {
    pub fn new(pool: Pool, args: Cli) -> Self {
        let rules = Arc::new(args.rules());
        Self {
            pool,
            args: Arc::new(args),
            rules,
        }
    }
}

impl FromRef<AppState> for Pool {
    fn from_ref(state: &AppState) -> Self {
        // pool uses an Arc internally so clone is cheap
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Rules> {
    fn from_ref(state: &AppState) -> Self {
        state.rules.clone()
    }
}
