//! PostgreSQL-backed user and team directory.
//!
//! Team creation runs in one transaction: the team row is claimed first and
//! members are upserted afterwards, so a taken name leaves every user row
//! untouched.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Text};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    Directory, DirectoryError, DirectoryStatistics, DirectoryWriteError, DirectoryWriter,
    StatisticsSourceError,
};
use crate::domain::{Team, TeamName, User, UserCounts, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{UserCountsRow, UserRow, to_count};
use super::pool::{DbPool, PoolError};
use super::schema::{teams, users};

/// Moves a user onto the new team's roster tail only when their team changes.
const UPSERT_MEMBER_SQL: &str = r#"
INSERT INTO users (user_id, username, team_name, is_active)
VALUES ($1, $2, $3, $4)
ON CONFLICT (user_id)
DO UPDATE SET
    username = EXCLUDED.username,
    is_active = EXCLUDED.is_active,
    roster_position = CASE
        WHEN users.team_name = EXCLUDED.team_name THEN users.roster_position
        ELSE EXCLUDED.roster_position
    END,
    team_name = EXCLUDED.team_name
"#;

const COUNT_USERS_SQL: &str = r#"
SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE is_active) AS active
FROM users
"#;

/// Diesel-backed implementation of the directory ports.
#[derive(Clone)]
pub struct DieselDirectory {
    pool: DbPool,
}

impl DieselDirectory {
    /// Create a new directory adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_read_pool_error(error: PoolError) -> DirectoryError {
    map_basic_pool_error(error, DirectoryError::connection)
}

fn map_read_diesel_error(error: diesel::result::Error, operation: &str) -> DirectoryError {
    map_basic_diesel_error(
        error,
        operation,
        DirectoryError::query,
        DirectoryError::connection,
    )
}

fn map_write_pool_error(error: PoolError) -> DirectoryWriteError {
    map_basic_pool_error(error, DirectoryWriteError::connection)
}

fn map_write_diesel_error(error: diesel::result::Error, operation: &str) -> DirectoryWriteError {
    map_basic_diesel_error(
        error,
        operation,
        DirectoryWriteError::query,
        DirectoryWriteError::connection,
    )
}

fn map_statistics_diesel_error(error: diesel::result::Error) -> StatisticsSourceError {
    map_basic_diesel_error(
        error,
        "count users",
        StatisticsSourceError::query,
        StatisticsSourceError::connection,
    )
}

fn rows_to_team(name: TeamName, rows: Vec<UserRow>) -> Result<Team, String> {
    let members = rows
        .into_iter()
        .map(UserRow::into_member)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Team::new(name, members))
}

async fn load_roster(
    conn: &mut AsyncPgConnection,
    name: &TeamName,
) -> Result<Vec<UserRow>, diesel::result::Error> {
    users::table
        .filter(users::team_name.eq(name.as_str()))
        .order((users::roster_position.asc(), users::user_id.asc()))
        .select(UserRow::as_select())
        .load(conn)
        .await
}

#[async_trait]
impl Directory for DieselDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_pool_error)?;
        let row = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_diesel_error(err, "find user"))?;

        row.map(User::try_from)
            .transpose()
            .map_err(DirectoryError::query)
    }

    async fn find_team(&self, name: &TeamName) -> Result<Option<Team>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_read_pool_error)?;
        let found = teams::table
            .find(name.as_str())
            .select(teams::team_name)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_read_diesel_error(err, "find team"))?;
        if found.is_none() {
            return Ok(None);
        }

        let rows = load_roster(&mut conn, name)
            .await
            .map_err(|err| map_read_diesel_error(err, "load roster"))?;
        rows_to_team(name.clone(), rows)
            .map(Some)
            .map_err(DirectoryError::query)
    }
}

#[async_trait]
impl DirectoryWriter for DieselDirectory {
    async fn create_team(&self, team: &Team) -> Result<Team, DirectoryWriteError> {
        let mut conn = self.pool.get().await.map_err(map_write_pool_error)?;
        let name = team.name();

        let created = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let claimed = diesel::insert_into(teams::table)
                        .values(teams::team_name.eq(name.as_str()))
                        .on_conflict(teams::team_name)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    if claimed == 0 {
                        return Ok(None);
                    }

                    for member in team.members() {
                        sql_query(UPSERT_MEMBER_SQL)
                            .bind::<Text, _>(member.id.as_str())
                            .bind::<Text, _>(member.username.as_str())
                            .bind::<Text, _>(name.as_str())
                            .bind::<Bool, _>(member.active)
                            .execute(conn)
                            .await?;
                    }

                    load_roster(conn, name).await.map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_diesel_error(err, "create team"))?;

        let Some(rows) = created else {
            debug!(team = %name, "team name already taken");
            return Err(DirectoryWriteError::team_exists(name.as_str()));
        };
        rows_to_team(name.clone(), rows).map_err(DirectoryWriteError::query)
    }

    async fn set_user_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> Result<Option<User>, DirectoryWriteError> {
        let mut conn = self.pool.get().await.map_err(map_write_pool_error)?;
        let row = diesel::update(users::table.find(id.as_str()))
            .set(users::is_active.eq(active))
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_diesel_error(err, "set user activity"))?;

        row.map(User::try_from)
            .transpose()
            .map_err(DirectoryWriteError::query)
    }
}

#[async_trait]
impl DirectoryStatistics for DieselDirectory {
    async fn count_teams(&self) -> Result<u64, StatisticsSourceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, StatisticsSourceError::connection))?;
        let total = teams::table
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    "count teams",
                    StatisticsSourceError::query,
                    StatisticsSourceError::connection,
                )
            })?;
        Ok(to_count(total))
    }

    async fn count_users(&self) -> Result<UserCounts, StatisticsSourceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, StatisticsSourceError::connection))?;
        let row = sql_query(COUNT_USERS_SQL)
            .get_result::<UserCountsRow>(&mut conn)
            .await
            .map_err(map_statistics_diesel_error)?;
        Ok(UserCounts {
            total: to_count(row.total),
            active: to_count(row.active),
        })
    }
}
