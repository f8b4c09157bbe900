use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{params, Connection},
    sea_query::{enum_def, Expr, Order, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("pushup_logs"))]
#[cfg_attr(feature = "backend", check("../../../server/migrations/002-pushup_logs/up.sql"))]
#[cfg_attr(feature = "backend", enum_def(table_name = "pushup_logs"))]
pub struct PushupLog {
    pub id: i64,
    pub user_id: i64,
    pub count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("pushup_logs"))]
pub struct NewPushupLog {
    pub user_id: i64,
    pub count: u32,
    pub created_at: DateTime<Utc>,
}

impl NewPushupLog {
    pub fn new(user_id: i64, count: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            count,
            created_at,
        }
    }
}

/// `/history` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub total: u64,
    /// Newest first
    pub logs: Vec<PushupLog>,
}

#[cfg(feature = "backend")]
impl PushupLog {
    pub fn fetch_by_user(conn: &Connection, user_id: i64) -> Result<Vec<PushupLog>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns([
                PushupLogIden::Id,
                PushupLogIden::UserId,
                PushupLogIden::Count,
                PushupLogIden::CreatedAt,
            ])
            .from(PushupLogIden::Table)
            .and_where(Expr::col(PushupLogIden::UserId).eq(user_id))
            .order_by(PushupLogIden::CreatedAt, Order::Desc)
            .order_by(PushupLogIden::Id, Order::Desc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let logs = stmt
            .query_map(&*values.as_params(), PushupLog::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    pub fn total_for_user(conn: &Connection, user_id: i64) -> Result<u64, rusqlite::Error> {
        let mut stmt = conn.prepare_cached(
            "SELECT COALESCE(SUM(count), 0) FROM pushup_logs WHERE user_id = ?1",
        )?;
        let total: i64 = stmt.query_row(params![user_id], |row| row.get(0))?;

        // Counts are never negative
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[cfg(feature = "backend")]
impl History {
    pub fn fetch(conn: &Connection, user_id: i64) -> Result<History, rusqlite::Error> {
        Ok(History {
            total: PushupLog::total_for_user(conn, user_id)?,
            logs: PushupLog::fetch_by_user(conn, user_id)?,
        })
    }
}
