//! Commit timestamps and their human-readable age.

use chrono::{DateTime, Duration, TimeZone, Utc};
use git2::Repository;

use crate::Result;

/// Timestamp of the commit HEAD points to, or `None` on an unborn branch.
pub fn last_commit_time(repo: &Repository) -> Result<Option<DateTime<Utc>>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(_) => return Ok(None),
    };
    let commit = head.peel_to_commit()?;

    let dt = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default();

    Ok(Some(dt))
}

/// Render how long ago `then` was, relative to `now`.
///
/// Under an hour: "minutes ago (YYYY-MM-DD HH:MM)"; under a day:
/// "N hour(s) ago (...)"; otherwise "N day(s) ago (YYYY-MM-DD)".
pub fn describe_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(then);

    if age < Duration::hours(1) {
        format!("minutes ago ({})", then.format("%Y-%m-%d %H:%M"))
    } else if age < Duration::days(1) {
        format!(
            "{} hour(s) ago ({})",
            age.num_hours(),
            then.format("%Y-%m-%d %H:%M")
        )
    } else {
        format!("{} day(s) ago ({})", age.num_days(), then.format("%Y-%m-%d"))
    }
}
