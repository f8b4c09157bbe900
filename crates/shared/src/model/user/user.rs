use chrono::{DateTime, Utc};
use serde::Serialize;

#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Query, SqliteQueryBuilder, Value},
    sea_query_rusqlite::RusqliteBinder,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("users"))]
#[cfg_attr(feature = "backend", check("../../../../server/migrations/001-users/up.sql"))]
#[cfg_attr(feature = "backend", enum_def(table_name = "users"))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    /// Cleared to terminate an account without deleting it
    pub is_active: bool,
    pub banned_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_banned(&self, now: DateTime<Utc>) -> bool {
        self.banned_until.is_some_and(|until| until > now)
    }

    /// Whether a session for this user is still honoured
    pub fn can_log_in(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_banned(now)
    }
}

#[cfg(feature = "backend")]
impl User {
    const COLUMNS: [UserIden; 8] = [
        UserIden::Id,
        UserIden::Username,
        UserIden::Email,
        UserIden::PasswordHash,
        UserIden::IsStaff,
        UserIden::IsActive,
        UserIden::BannedUntil,
        UserIden::CreatedAt,
    ];

    pub fn fetch_by_id(conn: &Connection, id: i64) -> Result<User, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row)?;
        Ok(user)
    }

    pub fn fetch_by_column_maybe<V: Into<Value>>(
        conn: &Connection,
        value: V,
        column: UserIden,
    ) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns(Self::COLUMNS)
            .from(UserIden::Table)
            .and_where(Expr::col(column).eq(value))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row).optional()?;
        Ok(user)
    }

    pub fn fetch_by_id_maybe(conn: &Connection, id: i64) -> Result<Option<User>, rusqlite::Error> {
        Self::fetch_by_column_maybe(conn, id, UserIden::Id)
    }

    /// Usernames are matched case insensitively (see the `users` migration)
    pub fn fetch_by_username<T: AsRef<str>>(
        conn: &Connection,
        username: T,
    ) -> Result<Option<User>, rusqlite::Error> {
        Self::fetch_by_column_maybe(conn, username.as_ref(), UserIden::Username)
    }

    pub fn fetch_by_email<T: AsRef<str>>(
        conn: &Connection,
        email: T,
    ) -> Result<Option<User>, rusqlite::Error> {
        Self::fetch_by_column_maybe(conn, email.as_ref(), UserIden::Email)
    }

    pub fn update(&self, conn: &Connection) -> Result<(), rusqlite::Error> {
        let (sql, values) = Query::update()
            .table(UserIden::Table)
            .values([
                (UserIden::Username, self.username.clone().into()),
                (UserIden::Email, self.email.clone().into()),
                (UserIden::PasswordHash, self.password_hash.clone().into()),
                (UserIden::IsStaff, self.is_staff.into()),
                (UserIden::IsActive, self.is_active.into()),
                (UserIden::BannedUntil, self.banned_until.into()),
            ])
            .and_where(Expr::col(UserIden::Id).eq(self.id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(&*values.as_params())?;

        Ok(())
    }

    /// Deletes the user along with their logs and progress (cascaded by the
    /// foreign keys). Returns false if there was no such user
    pub fn delete(conn: &Connection, id: i64) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::delete()
            .from_table(UserIden::Table)
            .and_where(Expr::col(UserIden::Id).eq(id))
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let deleted = stmt.execute(&*values.as_params())?;

        Ok(deleted > 0)
    }
}
