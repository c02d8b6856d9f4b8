//! Progression engine: the mutation operations that turn visits, anxiety
//! reports, and completed sessions into crack/repair history and streaks.
//!
//! All operations take an injectable `now` so date arithmetic is testable,
//! and operate purely on the in-memory profile. Persistence is the caller's
//! concern.

use crate::profile::{Activity, ActivityDetails, Crack, Profile};
use crate::types::{ActivityKind, CrackKind};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a check-in did, for the confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct VisitOutcome {
    /// False when the profile already checked in on this calendar day.
    pub first_today: bool,
    /// Absence cracks appended for days with no visit.
    pub missed_days: u32,
    pub streak: u32,
}

/// What an activity completion did.
#[derive(Debug, Clone, Serialize)]
pub struct RepairOutcome {
    /// Id of the crack this activity repaired, if any was outstanding.
    pub repaired_crack: Option<String>,
    /// True when a caller-supplied activity id was already recorded and the
    /// call was dropped as a duplicate submission.
    pub duplicate: bool,
}

/// Upper bound on absence cracks appended by a single visit. A long gap
/// still resets the streak and updates the visit counters, but only the
/// most recent missed days become cracks, so one check-in with a distant
/// timestamp cannot grow the profile without bound.
pub const MAX_ABSENCE_CRACKS_PER_VISIT: i64 = 30;

// ---------------------------------------------------------------------------
// Date arithmetic
// ---------------------------------------------------------------------------

/// Whole-day difference between two timestamps on the UTC calendar,
/// symmetric (absolute value). Month and year boundaries are handled by
/// `NaiveDate` subtraction.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a.date_naive() - b.date_naive()).num_days().abs()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl Profile {
    /// Record a visit. Idempotent within a calendar day; strictly additive
    /// otherwise. A gap of `g > 1` days appends one absence crack per missed
    /// day, capped at [`MAX_ABSENCE_CRACKS_PER_VISIT`] (most recent days
    /// first), and resets the streak. A `now` earlier than `last_visit`
    /// (client clock skew) is treated as the same day.
    pub fn record_visit(&mut self, now: DateTime<Utc>) -> VisitOutcome {
        let last = self.last_visit.date_naive();
        let today = now.date_naive();
        let gap = (today - last).num_days();

        if gap <= 0 {
            return VisitOutcome {
                first_today: false,
                missed_days: 0,
                streak: self.stats.current_streak,
            };
        }

        let mut missed_days = 0u32;
        if gap == 1 {
            self.stats.current_streak = self.stats.current_streak.saturating_add(1);
        } else {
            // One absence crack per day strictly between last visit and
            // today, bounded so a distant timestamp cannot flood the profile.
            let first_missed =
                (today - Duration::days(MAX_ABSENCE_CRACKS_PER_VISIT)).max(last + Duration::days(1));
            let mut day = first_missed;
            while day < today {
                let midnight = day.and_time(NaiveTime::MIN).and_utc();
                self.cracks
                    .push(Crack::new(CrackKind::Absence, midnight, None));
                missed_days += 1;
                day += Duration::days(1);
            }
            self.stats.current_streak = 1;
        }

        self.stats.total_visits = self.stats.total_visits.saturating_add(1);
        self.stats.longest_streak = self.stats.longest_streak.max(self.stats.current_streak);
        self.last_visit = now;

        VisitOutcome {
            first_today: true,
            missed_days,
            streak: self.stats.current_streak,
        }
    }

    /// Record an anxiety report: one new unrepaired crack carrying the text.
    /// Nothing else changes.
    pub fn record_anxiety(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> &Crack {
        self.cracks
            .push(Crack::new(CrackKind::Anxiety, now, Some(text.into())));
        self.cracks.last().unwrap()
    }

    /// Record a completed therapy session. Appends an activity, repairs the
    /// oldest unrepaired crack (at most one per call), and bumps the stats
    /// counter for the mode.
    ///
    /// `activity_id` is an optional idempotency key: if an activity with the
    /// same id already exists the call is a no-op, so flaky clients can
    /// resubmit safely. Without one, a fresh uuid is generated and repeats
    /// are accepted as distinct sessions.
    pub fn record_activity(
        &mut self,
        kind: ActivityKind,
        details: Option<ActivityDetails>,
        activity_id: Option<String>,
        now: DateTime<Utc>,
    ) -> RepairOutcome {
        let id = match activity_id {
            Some(id) => {
                if self.activities.iter().any(|a| a.id == id) {
                    return RepairOutcome {
                        repaired_crack: None,
                        duplicate: true,
                    };
                }
                id
            }
            None => uuid::Uuid::new_v4().to_string(),
        };

        // Saturating adds: the stats counters are documented monotone, so a
        // huge caller-supplied increment must pin at the max, not wrap.
        match kind {
            ActivityKind::Garden => {
                let actions = details
                    .as_ref()
                    .and_then(|d| d.action_count)
                    .unwrap_or(1);
                self.stats.garden_actions = self.stats.garden_actions.saturating_add(actions);
            }
            ActivityKind::Study => {
                self.stats.study_sessions = self.stats.study_sessions.saturating_add(1);
            }
            ActivityKind::Tatami => {
                self.stats.tatami_sessions = self.stats.tatami_sessions.saturating_add(1);
            }
        }

        self.activities.push(Activity {
            id,
            kind,
            date: now,
            details,
        });

        // FIFO: oldest unrepaired crack gets the gold.
        let repaired_crack = self.cracks.iter_mut().find(|c| !c.repaired).map(|crack| {
            crack.repaired = true;
            crack.repaired_date = Some(now);
            crack.id.clone()
        });
        if repaired_crack.is_some() {
            self.total_repairs = self.total_repairs.saturating_add(1);
        }

        RepairOutcome {
            repaired_crack,
            duplicate: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
