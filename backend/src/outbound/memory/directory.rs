//! In-process directory adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    Directory, DirectoryError, DirectoryStatistics, DirectoryWriteError, DirectoryWriter,
    StatisticsSourceError,
};
use crate::domain::{Team, TeamMember, TeamName, User, UserCounts, UserId};

use super::{POISONED, count};

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    rosters: HashMap<TeamName, Vec<UserId>>,
}

impl DirectoryState {
    fn team(&self, name: &TeamName) -> Option<Team> {
        let roster = self.rosters.get(name)?;
        let members = roster
            .iter()
            .filter_map(|id| self.users.get(id))
            .map(|user| TeamMember::new(user.id().clone(), user.username().clone(), user.is_active()))
            .collect();
        Some(Team::new(name.clone(), members))
    }

    fn upsert_member(&mut self, team: &TeamName, member: &TeamMember) {
        let previous_team = self
            .users
            .get(&member.id)
            .map(|existing| existing.team().clone());
        match previous_team {
            Some(previous) if previous == *team => {}
            Some(previous) => {
                if let Some(roster) = self.rosters.get_mut(&previous) {
                    roster.retain(|id| *id != member.id);
                }
                self.append(team, &member.id);
            }
            None => self.append(team, &member.id),
        }
        self.users
            .insert(member.id.clone(), member.clone().into_user(team.clone()));
    }

    fn append(&mut self, team: &TeamName, id: &UserId) {
        self.rosters.entry(team.clone()).or_default().push(id.clone());
    }
}

/// Directory held in process memory.
///
/// Every operation runs under a single lock, so team creation and member
/// upserts are observed all at once or not at all.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, DirectoryState>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        let state = self.lock().map_err(DirectoryError::connection)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_team(&self, name: &TeamName) -> Result<Option<Team>, DirectoryError> {
        let state = self.lock().map_err(DirectoryError::connection)?;
        Ok(state.team(name))
    }
}

#[async_trait]
impl DirectoryWriter for InMemoryDirectory {
    async fn create_team(&self, team: &Team) -> Result<Team, DirectoryWriteError> {
        let mut state = self.lock().map_err(DirectoryWriteError::connection)?;
        if state.rosters.contains_key(team.name()) {
            return Err(DirectoryWriteError::team_exists(team.name().as_str()));
        }

        state.rosters.insert(team.name().clone(), Vec::new());
        for member in team.members() {
            state.upsert_member(team.name(), member);
        }

        state
            .team(team.name())
            .ok_or_else(|| DirectoryWriteError::query("team vanished during creation"))
    }

    async fn set_user_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> Result<Option<User>, DirectoryWriteError> {
        let mut state = self.lock().map_err(DirectoryWriteError::connection)?;
        let Some(user) = state.users.remove(id) else {
            return Ok(None);
        };
        let updated = user.with_active(active);
        state.users.insert(id.clone(), updated.clone());
        Ok(Some(updated))
    }
}

#[async_trait]
impl DirectoryStatistics for InMemoryDirectory {
    async fn count_teams(&self) -> Result<u64, StatisticsSourceError> {
        let state = self.lock().map_err(StatisticsSourceError::connection)?;
        Ok(count(state.rosters.len()))
    }

    async fn count_users(&self) -> Result<UserCounts, StatisticsSourceError> {
        let state = self.lock().map_err(StatisticsSourceError::connection)?;
        Ok(UserCounts {
            total: count(state.users.len()),
            active: count(state.users.values().filter(|user| user.is_active()).count()),
        })
    }
}
