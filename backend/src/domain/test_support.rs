//! Builders shared by domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{PullRequest, PullRequestId, Team, TeamMember, TeamName, User, UserId, Username};

pub(crate) struct FixtureClock {
    pub(crate) utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub(crate) fn team_name(raw: &str) -> TeamName {
    TeamName::new(raw).expect("valid team name")
}

pub(crate) fn pull_request_id(raw: &str) -> PullRequestId {
    PullRequestId::new(raw).expect("valid pull request id")
}

pub(crate) fn member(raw: &str, active: bool) -> TeamMember {
    TeamMember::new(
        user_id(raw),
        Username::new(format!("user {raw}")).expect("valid username"),
        active,
    )
}

pub(crate) fn user(raw: &str, team: &str, active: bool) -> User {
    member(raw, active).into_user(team_name(team))
}

/// Build a team from `(id, active)` pairs in roster order.
pub(crate) fn team(name: &str, roster: &[(&str, bool)]) -> Team {
    Team::new(
        team_name(name),
        roster
            .iter()
            .map(|(raw, active)| member(raw, *active))
            .collect(),
    )
}

pub(crate) fn open_pull_request(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
    PullRequest::open(
        pull_request_id(id),
        format!("change {id}"),
        user_id(author),
        reviewers.iter().map(|raw| user_id(raw)).collect(),
        fixture_timestamp(),
    )
}
