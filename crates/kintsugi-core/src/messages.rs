//! Localized confirmation messages and the static daily koan.
//!
//! Keyed by enum rather than string so a missing translation is a compile
//! error, not a silent fallback to the raw key.

use crate::types::{ActivityKind, Lang};
use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Confirmation messages
// ---------------------------------------------------------------------------

/// Events the API confirms back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// First check-in of the day; carries the current streak.
    CheckinFirst { streak: u32 },
    /// Repeated check-in on the same day.
    CheckinRepeat,
    /// Check-in after missed days; carries how many cracks were added.
    CheckinMissed { missed: u32 },
    AnxietyRecorded,
    /// Activity recorded; true when it repaired a crack.
    ActivityRecorded { kind: ActivityKind, repaired: bool },
}

pub fn confirmation(lang: Lang, event: Event) -> String {
    match (lang, event) {
        (Lang::En, Event::CheckinFirst { streak }) => {
            format!("Welcome back. Your streak is {streak} day(s).")
        }
        (Lang::Ja, Event::CheckinFirst { streak }) => {
            format!("おかえりなさい。連続{streak}日目です。")
        }
        (Lang::En, Event::CheckinRepeat) => "Already checked in today.".to_string(),
        (Lang::Ja, Event::CheckinRepeat) => "本日はすでにチェックイン済みです。".to_string(),
        (Lang::En, Event::CheckinMissed { missed }) => {
            format!("Welcome back. {missed} day(s) passed; the vessel carries new cracks.")
        }
        (Lang::Ja, Event::CheckinMissed { missed }) => {
            format!("おかえりなさい。{missed}日間が過ぎ、器に新しいひびが入りました。")
        }
        (Lang::En, Event::AnxietyRecorded) => {
            "Your worry has been set down. A crack appears, waiting for gold.".to_string()
        }
        (Lang::Ja, Event::AnxietyRecorded) => {
            "不安を書き留めました。ひびは金を待っています。".to_string()
        }
        (Lang::En, Event::ActivityRecorded { kind, repaired }) => {
            let room = match kind {
                ActivityKind::Garden => "garden",
                ActivityKind::Study => "study",
                ActivityKind::Tatami => "tatami room",
            };
            if repaired {
                format!("Session in the {room} complete. A crack has been filled with gold.")
            } else {
                format!("Session in the {room} complete.")
            }
        }
        (Lang::Ja, Event::ActivityRecorded { kind, repaired }) => {
            let room = match kind {
                ActivityKind::Garden => "庭",
                ActivityKind::Study => "書斎",
                ActivityKind::Tatami => "畳の間",
            };
            if repaired {
                format!("{room}での時間が終わりました。ひびが金で埋まりました。")
            } else {
                format!("{room}での時間が終わりました。")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Daily koan
// ---------------------------------------------------------------------------

// Fallback content served when no AI guidance is available; also the fixed
// daily rotation, chosen by calendar date so every client sees the same one.
const KOANS_EN: &[&str] = &[
    "The cup is useful because it is empty.",
    "When walking, walk. When sitting, sit. Above all, do not wobble.",
    "The obstacle is the path.",
    "Spring comes, and the grass grows by itself.",
    "Let go, or be dragged.",
    "Sitting quietly, doing nothing, the pot mends itself with gold.",
    "No snowflake ever falls in the wrong place.",
];

const KOANS_JA: &[&str] = &[
    "器は空であるからこそ役に立つ。",
    "歩くときは歩き、座るときは座る。ぐらついてはならない。",
    "障害こそが道である。",
    "春来たりて草自ら生ず。",
    "手放しなさい。さもなくば引きずられる。",
    "静かに座り、何もしなければ、器はおのずと金で継がれる。",
    "間違った場所に落ちる雪はひとつもない。",
];

/// The koan for a calendar date. Same date, same koan, in every locale pair.
pub fn daily_koan(lang: Lang, date: NaiveDate) -> &'static str {
    let table = match lang {
        Lang::En => KOANS_EN,
        Lang::Ja => KOANS_JA,
    };
    let days = date.num_days_from_ce().rem_euclid(table.len() as i32);
    table[days as usize]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
