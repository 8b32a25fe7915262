//! Diesel table definitions for the reviewer assignment tables.
//!
//! Migrations are managed outside this crate; these definitions mirror the
//! expected layout.

diesel::table! {
    /// Teams keyed by their unique name.
    teams (team_name) {
        team_name -> Text,
    }
}

diesel::table! {
    /// Directory users.
    ///
    /// `roster_position` is drawn from a sequence when a user joins a team
    /// and orders each team's roster.
    users (user_id) {
        user_id -> Text,
        username -> Text,
        team_name -> Text,
        is_active -> Bool,
        roster_position -> Int8,
    }
}

diesel::table! {
    /// Pull requests and their ordered reviewer lists.
    pull_requests (pull_request_id) {
        pull_request_id -> Text,
        pull_request_name -> Text,
        author_id -> Text,
        /// Either `OPEN` or `MERGED`.
        status -> Text,
        assigned_reviewers -> Array<Text>,
        created_at -> Timestamptz,
        merged_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(users -> teams (team_name));
diesel::joinable!(pull_requests -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(teams, users, pull_requests);
