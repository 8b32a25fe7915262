//! Behaviour-driven tests for reviewer assignment and reassignment.
//!
//! Scenarios run against the in-memory engine and cover initial selection,
//! replacement order, and the rejections that leave reviewer lists intact.

use std::sync::Arc;

use mockable::DefaultClock;
use reviewer_engine::Engine;
use reviewer_engine::domain::ports::{CreatePullRequestRequest, ReassignReviewerRequest};
use reviewer_engine::domain::{
    PullRequestId, Team, TeamMember, TeamName, UserId, Username,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tokio::runtime::Runtime;

// -----------------------------------------------------------------------------
// Test World
// -----------------------------------------------------------------------------

/// Wrapper for the non-Clone runtime.
#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct AssignmentWorld {
    runtime: Slot<RuntimeHandle>,
    engine: Slot<Engine>,
    replacement: Slot<String>,
    last_error: Slot<String>,
}

impl AssignmentWorld {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        let runtime = self.runtime.get().unwrap_or_else(|| {
            let handle = RuntimeHandle(Arc::new(Runtime::new().expect("create runtime")));
            self.runtime.set(handle.clone());
            handle
        });
        runtime.0.block_on(future)
    }

    fn engine(&self) -> Engine {
        self.engine.get().unwrap_or_else(|| {
            let engine = Engine::in_memory(Arc::new(DefaultClock));
            self.engine.set(engine.clone());
            engine
        })
    }

    fn record_error(&self, error: &reviewer_engine::domain::Error) {
        self.last_error.set(error.code().as_str().to_owned());
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim_matches('"')
}

fn user_id(raw: &str) -> UserId {
    UserId::new(unquote(raw)).expect("valid user id")
}

fn pull_request_id(raw: &str) -> PullRequestId {
    PullRequestId::new(unquote(raw)).expect("valid pull request id")
}

fn id_list(raw: &str) -> Vec<String> {
    unquote(raw)
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

#[fixture]
fn world() -> AssignmentWorld {
    AssignmentWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a team {team} with active members {members}")]
fn a_team_with_active_members(world: &AssignmentWorld, team: String, members: String) {
    let name = TeamName::new(unquote(&team)).expect("valid team name");
    let roster = id_list(&members)
        .into_iter()
        .map(|id| {
            TeamMember::new(
                UserId::new(id.as_str()).expect("valid user id"),
                Username::new(format!("user-{id}")).expect("valid username"),
                true,
            )
        })
        .collect();

    let engine = world.engine();
    world
        .block_on(engine.teams.add_team(Team::new(name, roster)))
        .expect("team created");
}

#[given("member {user} is inactive")]
fn member_is_inactive(world: &AssignmentWorld, user: String) {
    let engine = world.engine();
    world
        .block_on(engine.teams.set_user_active(&user_id(&user), false))
        .expect("member deactivated");
}

fn open_pull_request(world: &AssignmentWorld, author: &str, id: &str) {
    let engine = world.engine();
    let request = CreatePullRequestRequest {
        id: pull_request_id(id),
        name: format!("Change {}", unquote(id)),
        author: user_id(author),
    };
    if let Err(error) = world.block_on(engine.pull_requests.create_pull_request(request)) {
        world.record_error(&error);
    }
}

#[given("{author} opens pull request {id}")]
fn author_has_opened_pull_request(world: &AssignmentWorld, author: String, id: String) {
    open_pull_request(world, &author, &id);
    assert!(
        world.last_error.get().is_none(),
        "setup pull request should open"
    );
}

#[given("pull request {id} is merged")]
fn pull_request_is_merged(world: &AssignmentWorld, id: String) {
    let engine = world.engine();
    world
        .block_on(engine.pull_requests.merge_pull_request(&pull_request_id(&id)))
        .expect("pull request merged");
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("{author} opens pull request {id}")]
fn author_opens_pull_request(world: &AssignmentWorld, author: String, id: String) {
    open_pull_request(world, &author, &id);
}

#[when("{reviewer} is reassigned away from pull request {id}")]
fn reviewer_is_reassigned(world: &AssignmentWorld, reviewer: String, id: String) {
    let engine = world.engine();
    let request = ReassignReviewerRequest {
        pull_request_id: pull_request_id(&id),
        old_reviewer: user_id(&reviewer),
    };
    match world.block_on(engine.pull_requests.reassign_reviewer(request)) {
        Ok(response) => world
            .replacement
            .set(response.replaced_by.as_str().to_owned()),
        Err(error) => world.record_error(&error),
    }
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("pull request {id} has reviewers {reviewers}")]
fn pull_request_has_reviewers(world: &AssignmentWorld, id: String, reviewers: String) {
    let engine = world.engine();
    let pull_request = world
        .block_on(
            engine
                .pull_request_queries
                .get_pull_request(&pull_request_id(&id)),
        )
        .expect("pull request exists");
    let actual: Vec<String> = pull_request
        .reviewers()
        .iter()
        .map(|reviewer| reviewer.as_str().to_owned())
        .collect();
    assert_eq!(actual, id_list(&reviewers));
}

#[then("the replacement reviewer is {reviewer}")]
fn the_replacement_reviewer_is(world: &AssignmentWorld, reviewer: String) {
    let replacement = world.replacement.get().expect("reassignment succeeded");
    assert_eq!(replacement, unquote(&reviewer));
}

#[then("the request fails with {code}")]
fn the_request_fails_with(world: &AssignmentWorld, code: String) {
    let actual = world.last_error.get().expect("request should fail");
    assert_eq!(actual, unquote(&code));
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/reviewer_assignment.feature",
    name = "Opening a pull request assigns the first two teammates"
)]
fn opening_assigns_first_two_teammates(world: AssignmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reviewer_assignment.feature",
    name = "Inactive members and the author are never assigned"
)]
fn inactive_members_and_author_are_skipped(world: AssignmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reviewer_assignment.feature",
    name = "Reassignment picks the first eligible teammate"
)]
fn reassignment_picks_first_eligible_teammate(world: AssignmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reviewer_assignment.feature",
    name = "Reassignment without a candidate changes nothing"
)]
fn reassignment_without_candidate_changes_nothing(world: AssignmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reviewer_assignment.feature",
    name = "Merged pull requests keep their reviewers"
)]
fn merged_pull_requests_keep_their_reviewers(world: AssignmentWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/reviewer_assignment.feature",
    name = "Pull request identifiers are unique"
)]
fn pull_request_identifiers_are_unique(world: AssignmentWorld) {
    let _ = world;
}
