//! Cross-device snapshot merge. A client snapshot and a server snapshot are
//! reconciled with last-write-wins on the event sequences and element-wise
//! max on the monotone counters, so merges are idempotent and racing writers
//! converge without coordination.

use crate::profile::Profile;

/// Merge two snapshots of the same profile. The snapshot with the later
/// `last_visit` is the base; the other contributes counter maxima. The crack
/// and activity sequences (and `total_repairs` with them) always come from
/// the base, so the repair invariant cannot be broken by a merge.
pub fn merge(a: &Profile, b: &Profile) -> Profile {
    let (base, other) = if a.last_visit >= b.last_visit {
        (a, b)
    } else {
        (b, a)
    };
    let mut merged = base.clone();

    merged.created_at = base.created_at.min(other.created_at);
    merged.stats.total_visits = base.stats.total_visits.max(other.stats.total_visits);
    merged.stats.longest_streak = base.stats.longest_streak.max(other.stats.longest_streak);
    merged.stats.garden_actions = base.stats.garden_actions.max(other.stats.garden_actions);
    merged.stats.study_sessions = base.stats.study_sessions.max(other.stats.study_sessions);
    merged.stats.tatami_sessions = base.stats.tatami_sessions.max(other.stats.tatami_sessions);

    merged
}
