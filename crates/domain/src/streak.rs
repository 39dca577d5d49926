use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

/// Computes `(current_streak, longest_streak)` from the set of distinct UTC
/// calendar days on which at least one entry exists, given `today`.
///
/// Pure function of its inputs, per the spec's streak invariant — no I/O,
/// no clock reads; callers pass `today` explicitly so the result is
/// reproducible in tests.
#[must_use]
pub fn compute_streaks(today: NaiveDate, days: &BTreeSet<NaiveDate>) -> (i32, i32) {
    if days.is_empty() {
        return (0, 0);
    }

    let mut descending: Vec<NaiveDate> = days.iter().copied().collect();
    descending.sort_unstable_by(|a, b| b.cmp(a));

    let longest = longest_run(&descending);

    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let most_recent = descending[0];
    if most_recent != today && most_recent != yesterday {
        return (0, longest);
    }

    let mut current = 1;
    for window in descending.windows(2) {
        let gap = window[0] - window[1];
        if gap == chrono::Duration::days(1) {
            current += 1;
        } else {
            break;
        }
    }

    (current, longest)
}

fn longest_run(descending: &[NaiveDate]) -> i32 {
    let mut longest = 1;
    let mut run = 1;
    for window in descending.windows(2) {
        let gap = window[0] - window[1];
        if gap == chrono::Duration::days(1) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }
    longest
}
