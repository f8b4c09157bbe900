use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Owner, ProgressState};

#[cfg(feature = "backend")]
use {
    super::Rules,
    crate::model::NewPushupLog,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension, TransactionBehavior},
    sea_query::{enum_def, Expr, Query, SimpleExpr, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::{debug, instrument},
};

/// Persistence for [`ProgressState`], one record per [`Owner`]
pub trait ProgressStore {
    type Error;

    /// Returns the zero-state if nothing has been saved for the owner yet
    fn load(&self, owner: Owner) -> Result<ProgressState, Self::Error>;

    fn save(&self, owner: Owner, state: &ProgressState) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("progress"))]
#[cfg_attr(feature = "backend", check("../../../../server/migrations/003-progress/up.sql"))]
#[cfg_attr(feature = "backend", enum_def(table_name = "progress"))]
pub struct Progress {
    pub id: i64,
    /// `None` for the shared record
    pub user_id: Option<i64>,
    pub done: u32,
    pub emergency_until: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("progress"))]
pub struct NewProgress {
    pub user_id: Option<i64>,
    pub done: u32,
    pub emergency_until: DateTime<Utc>,
}

impl NewProgress {
    pub fn new(owner: Owner, state: &ProgressState) -> Self {
        Self {
            user_id: owner.user_id(),
            done: state.done,
            emergency_until: state.emergency_until,
        }
    }
}

impl From<Progress> for ProgressState {
    fn from(progress: Progress) -> Self {
        Self {
            done: progress.done,
            emergency_until: progress.emergency_until,
        }
    }
}

#[cfg(feature = "backend")]
fn owner_condition(owner: Owner) -> SimpleExpr {
    match owner {
        Owner::Shared => Expr::col(ProgressIden::UserId).is_null(),
        Owner::User(id) => Expr::col(ProgressIden::UserId).eq(id),
    }
}

#[cfg(feature = "backend")]
impl ProgressStore for Connection {
    type Error = rusqlite::Error;

    #[instrument(skip(self))]
    fn load(&self, owner: Owner) -> Result<ProgressState, Self::Error> {
        Ok(Progress::fetch_by_owner(self, owner)?
            .map(ProgressState::from)
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    fn save(&self, owner: Owner, state: &ProgressState) -> Result<(), Self::Error> {
        let (sql, values) = Query::update()
            .table(ProgressIden::Table)
            .values([
                (ProgressIden::Done, state.done.into()),
                (ProgressIden::EmergencyUntil, state.emergency_until.into()),
            ])
            .and_where(owner_condition(owner))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = self.prepare_cached(&sql)?;
        let updated = stmt.execute(&*values.as_params())?;

        // First save for this owner
        if updated == 0 {
            NewProgress::new(owner, state).insert(self)?;
        }

        Ok(())
    }
}

#[cfg(feature = "backend")]
impl Progress {
    pub fn fetch_by_owner(conn: &Connection, owner: Owner) -> Result<Option<Progress>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns([
                ProgressIden::Id,
                ProgressIden::UserId,
                ProgressIden::Done,
                ProgressIden::EmergencyUntil,
            ])
            .from(ProgressIden::Table)
            .and_where(owner_condition(owner))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let progress = stmt.query_row(&*values.as_params(), Progress::from_row).optional()?;
        Ok(progress)
    }

    /// Runs load, `f`, save for the owner inside one immediate transaction so
    /// concurrent requests can't lose each other's updates. Nothing is written
    /// if `f` leaves the state unchanged
    pub fn update<R, F>(
        conn: &mut Connection,
        owner: Owner,
        f: F,
    ) -> Result<(ProgressState, R), rusqlite::Error>
    where
        F: FnOnce(&mut ProgressState) -> R,
    {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut state = tx.load(owner)?;
        let original = state.clone();
        let result = f(&mut state);

        if state != original {
            tx.save(owner, &state)?;
        }

        tx.commit()?;

        Ok((state, result))
    }

    /// Adds `amount` to the owner's count. Logged in users also get a
    /// [`PushupLog`](crate::model::PushupLog) row for their history
    #[instrument(skip(conn))]
    pub fn log_pushups(
        conn: &mut Connection,
        owner: Owner,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<ProgressState, rusqlite::Error> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut state = tx.load(owner)?;
        state.log(amount);
        tx.save(owner, &state)?;

        if let Owner::User(user_id) = owner {
            if amount > 0 {
                NewPushupLog::new(user_id, amount, now).insert(&tx)?;
            }
        }

        tx.commit()?;

        debug!(done = state.done, "Logged pushups");
        Ok(state)
    }

    #[instrument(skip(conn))]
    pub fn start_emergency(
        conn: &mut Connection,
        owner: Owner,
        rules: &Rules,
        now: DateTime<Utc>,
    ) -> Result<ProgressState, rusqlite::Error> {
        let (state, _) = Self::update(conn, owner, |state| {
            state.start_emergency(now, rules.emergency_duration)
        })?;

        debug!(emergency_until = %state.emergency_until, "Started emergency");
        Ok(state)
    }

    /// Returns whether the code was accepted. A rejected code doesn't touch
    /// the database
    #[instrument(skip(conn, code, rules))]
    pub fn extend_emergency(
        conn: &mut Connection,
        owner: Owner,
        code: &str,
        rules: &Rules,
        now: DateTime<Utc>,
    ) -> Result<bool, rusqlite::Error> {
        if code != rules.passcode {
            debug!("Rejected emergency passcode");
            return Ok(false);
        }

        let (state, ok) =
            Self::update(conn, owner, |state| state.extend_emergency(code, rules, now))?;

        debug!(emergency_until = %state.emergency_until, "Extended emergency");
        Ok(ok)
    }
}
