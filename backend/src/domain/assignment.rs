//! Reviewer selection policies.
//!
//! Both policies are pure functions over a roster snapshot. They preserve
//! roster order and ignore current review load, so the same inputs always
//! produce the same reviewers.

use super::{PullRequest, TeamMember, UserId};

/// Maximum number of reviewers assigned when a pull request is opened.
pub const MAX_INITIAL_REVIEWERS: usize = 2;

/// Select the initial reviewers for a pull request by `author`.
///
/// Takes the first [`MAX_INITIAL_REVIEWERS`] active roster members other
/// than the author. An empty result is valid.
///
/// # Examples
/// ```
/// use reviewer_engine::domain::{TeamMember, UserId, Username, select_initial_reviewers};
///
/// let member = |id: &str, active: bool| {
///     TeamMember::new(
///         UserId::new(id).expect("id"),
///         Username::new(id).expect("name"),
///         active,
///     )
/// };
/// let roster = [member("A", true), member("B", false), member("C", true), member("D", true)];
/// let reviewers = select_initial_reviewers(&UserId::new("A").expect("id"), &roster);
/// let ids: Vec<&str> = reviewers.iter().map(UserId::as_str).collect();
/// assert_eq!(ids, ["C", "D"]);
/// ```
pub fn select_initial_reviewers(author: &UserId, roster: &[TeamMember]) -> Vec<UserId> {
    let mut selected: Vec<UserId> = Vec::with_capacity(MAX_INITIAL_REVIEWERS);
    for member in roster {
        if selected.len() == MAX_INITIAL_REVIEWERS {
            break;
        }
        if member.active && member.id != *author && !selected.contains(&member.id) {
            selected.push(member.id.clone());
        }
    }
    selected
}

/// Select a replacement for `outgoing` on `pull_request`.
///
/// `roster` is the outgoing reviewer's team. The first active member who is
/// neither the outgoing reviewer, the author, nor already a reviewer wins.
pub fn select_replacement(
    pull_request: &PullRequest,
    outgoing: &UserId,
    roster: &[TeamMember],
) -> Option<UserId> {
    roster
        .iter()
        .find(|member| {
            member.active
                && member.id != *outgoing
                && member.id != *pull_request.author()
                && !pull_request.has_reviewer(&member.id)
        })
        .map(|member| member.id.clone())
}
