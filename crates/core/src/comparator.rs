use crate::domain::{Snapshot, UnfollowerReport, Username};
use std::collections::HashSet;

/// Case-insensitive, whitespace-trimmed key used for membership checks.
/// Applied at comparison time only; output keeps original casing.
fn normalized(name: &Username) -> String {
    name.as_str().trim().to_lowercase()
}

fn sort_case_insensitive(names: &mut [Username]) {
    names.sort_by_key(|name| name.as_str().to_lowercase());
}

/// Accounts in `following` with no case-insensitive match in `followers`,
/// sorted case-insensitively. Set semantics: input order does not matter.
pub fn compare_not_following_back(
    followers: &[Username],
    following: &[Username],
) -> Vec<Username> {
    let follower_set: HashSet<String> = followers.iter().map(normalized).collect();
    let mut missing: Vec<Username> = following
        .iter()
        .filter(|name| !follower_set.contains(&normalized(name)))
        .cloned()
        .collect();
    sort_case_insensitive(&mut missing);
    missing
}

/// Accounts present in the saved snapshot but absent from the current
/// follower list. Without a snapshot there is nothing to compare against
/// and the report says so instead of erroring.
pub fn compute_unfollowers(
    current_followers: &[Username],
    snapshot: Option<&Snapshot>,
) -> UnfollowerReport {
    let snapshot = match snapshot {
        Some(snapshot) => snapshot,
        None => return UnfollowerReport::no_history(),
    };
    let current_set: HashSet<String> = current_followers.iter().map(normalized).collect();
    let mut gone: Vec<Username> = snapshot
        .usernames
        .iter()
        .filter(|name| !current_set.contains(&normalized(name)))
        .cloned()
        .collect();
    sort_case_insensitive(&mut gone);
    UnfollowerReport {
        unfollowers: gone,
        has_previous: true,
        snapshot_date: Some(snapshot.captured_at.clone()),
    }
}
