//! Derived vessel state: crack path geometry and the depth / gold / patina
//! metrics. Everything here is a pure function of a profile snapshot plus a
//! timestamp, and must be byte-identical across repeated calls — crack paths
//! are seeded from the crack id with an explicit FNV-1a hash so renderings
//! are reproducible across clients and ports.

use crate::engine::days_between;
use crate::profile::Profile;
use crate::types::CrackKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Deterministic hashing
// ---------------------------------------------------------------------------

const FNV_OFFSET: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a, 32-bit. The documented seed function for crack geometry.
pub fn fnv1a(s: &str) -> u32 {
    let mut hash = FNV_OFFSET;
    for byte in s.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Small deterministic bit mixer used to draw successive values from one
/// seed (xorshift32). Not a statistical RNG; stability is the only goal.
fn next(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Offset in [-8, 8] drawn from the mixer state.
fn jitter(state: &mut u32) -> i32 {
    (next(state) % 17) as i32 - 8
}

// ---------------------------------------------------------------------------
// Path templates
// ---------------------------------------------------------------------------

/// Control-point skeletons for crack lines, on a 200x300 vessel viewbox.
/// Each template is start + two quadratic segments.
const TEMPLATES: &[[(i32, i32); 5]] = &[
    [(40, 60), (70, 110), (95, 150), (110, 200), (125, 250)],
    [(160, 50), (135, 100), (120, 160), (95, 210), (80, 260)],
    [(100, 40), (85, 95), (105, 150), (90, 205), (105, 255)],
    [(60, 90), (95, 130), (130, 165), (150, 215), (140, 260)],
    [(145, 80), (110, 120), (75, 155), (65, 210), (90, 250)],
];

// ---------------------------------------------------------------------------
// VesselVisual
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrackVisual {
    /// SVG path data with integer coordinates, stable per (crack id, index).
    pub path: String,
    pub repaired: bool,
    pub kind: CrackKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselVisual {
    pub cracks: Vec<CrackVisual>,
    /// Experience accumulated, in [0, 100].
    pub depth: f64,
    /// Healing accumulated, in [0, 100].
    pub gold_intensity: f64,
    /// Time elapsed since profile creation, in [0, 100].
    pub patina: f64,
}

impl VesselVisual {
    pub fn compute(profile: &Profile, now: DateTime<Utc>) -> Self {
        let cracks = profile
            .cracks
            .iter()
            .enumerate()
            .map(|(index, crack)| CrackVisual {
                path: crack_path(&crack.id, index),
                repaired: crack.repaired,
                kind: crack.kind,
            })
            .collect();

        let depth = (profile.activities.len() as f64 * 5.0
            + profile.cracks.len() as f64 * 3.0
            + profile.stats.total_visits as f64)
            .clamp(0.0, 100.0);

        let repaired_ratio = if profile.cracks.is_empty() {
            0.0
        } else {
            profile.repaired_count() as f64 / profile.cracks.len() as f64
        };
        let gold_intensity =
            (repaired_ratio * 50.0 + profile.total_repairs as f64 * 5.0).clamp(0.0, 100.0);

        let patina =
            (days_between(profile.created_at, now) as f64 * 2.0).clamp(0.0, 100.0);

        Self {
            cracks,
            depth,
            gold_intensity,
            patina,
        }
    }
}

/// Path for one crack: the id hash and sequence position pick a template,
/// then perturb its control points within ±8 units. Same (id, index) pair,
/// same path, always.
fn crack_path(id: &str, index: usize) -> String {
    let hash = fnv1a(id);
    // Spread the index so adjacent cracks with similar ids diverge.
    let mut state = hash ^ (index as u32).wrapping_mul(0x9e37_79b9);
    if state == 0 {
        state = FNV_OFFSET;
    }

    let template = &TEMPLATES[(hash as usize + index) % TEMPLATES.len()];
    let points: Vec<(i32, i32)> = template
        .iter()
        .map(|&(x, y)| (x + jitter(&mut state), y + jitter(&mut state)))
        .collect();

    format!(
        "M {} {} Q {} {} {} {} Q {} {} {} {}",
        points[0].0,
        points[0].1,
        points[1].0,
        points[1].1,
        points[2].0,
        points[2].1,
        points[3].0,
        points[3].1,
        points[4].0,
        points[4].1,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ActivityDetails, Profile};
    use crate::types::ActivityKind;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn fnv1a_known_vectors() {
        // Published FNV-1a 32-bit test vectors.
        assert_eq!(fnv1a(""), 0x811c9dc5);
        assert_eq!(fnv1a("a"), 0xe40c292c);
        assert_eq!(fnv1a("foobar"), 0xbf9cf968);
    }

    #[test]
    fn crack_path_is_stable() {
        let a = crack_path("crack-1", 0);
        let b = crack_path("crack-1", 0);
        assert_eq!(a, b);
        assert!(a.starts_with("M "));
    }

    #[test]
    fn crack_path_varies_by_id_and_index() {
        assert_ne!(crack_path("crack-1", 0), crack_path("crack-2", 0));
        assert_ne!(crack_path("crack-1", 0), crack_path("crack-1", 1));
    }

    #[test]
    fn compute_is_deterministic() {
        let mut p = Profile::new_at("local", at(2024, 1, 1));
        p.record_anxiety("worry", at(2024, 1, 1));
        p.record_activity(ActivityKind::Garden, None, None, at(2024, 1, 1));

        let now = at(2024, 2, 1);
        let a = serde_json::to_string(&VesselVisual::compute(&p, now)).unwrap();
        let b = serde_json::to_string(&VesselVisual::compute(&p, now)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_profile_metrics() {
        // Fresh profile: one visit, no cracks, no activities, now == created.
        let p = Profile::new_at("local", at(2024, 1, 1));
        let visual = VesselVisual::compute(&p, at(2024, 1, 1));
        assert!(visual.cracks.is_empty());
        assert_eq!(visual.depth, 1.0);
        assert_eq!(visual.gold_intensity, 0.0);
        assert_eq!(visual.patina, 0.0);
    }

    #[test]
    fn metrics_are_bounded() {
        let mut p = Profile::new_at("local", at(2020, 1, 1));
        p.stats.total_visits = 100_000;
        for i in 0..60 {
            p.record_anxiety(format!("w{i}"), at(2020, 1, 2));
        }
        for i in 0..80 {
            p.record_activity(
                ActivityKind::Garden,
                Some(ActivityDetails {
                    action_count: Some(50),
                    ..ActivityDetails::default()
                }),
                None,
                at(2020, 1, 3 + i % 20),
            );
        }
        let visual = VesselVisual::compute(&p, at(2026, 1, 1));
        assert_eq!(visual.depth, 100.0);
        assert_eq!(visual.gold_intensity, 100.0);
        assert_eq!(visual.patina, 100.0);
    }

    #[test]
    fn gold_defined_without_cracks() {
        let mut p = Profile::new_at("local", at(2024, 1, 1));
        p.record_activity(ActivityKind::Study, None, None, at(2024, 1, 1));
        let visual = VesselVisual::compute(&p, at(2024, 1, 1));
        assert_eq!(visual.gold_intensity, 0.0);
    }

    #[test]
    fn one_visual_per_stored_crack() {
        let mut p = Profile::new_at("local", at(2024, 1, 1));
        p.record_anxiety("a", at(2024, 1, 1));
        p.record_visit(at(2024, 1, 4)); // two absence cracks
        p.record_activity(ActivityKind::Tatami, None, None, at(2024, 1, 4));

        let visual = VesselVisual::compute(&p, at(2024, 1, 4));
        assert_eq!(visual.cracks.len(), 3);
        assert!(visual.cracks[0].repaired);
        assert_eq!(visual.cracks[0].kind, CrackKind::Anxiety);
        assert!(!visual.cracks[1].repaired);
        assert_eq!(visual.cracks[1].kind, CrackKind::Absence);
    }

    #[test]
    fn half_repaired_gold_value() {
        let mut p = Profile::new_at("local", at(2024, 1, 1));
        p.record_anxiety("a", at(2024, 1, 1));
        p.record_anxiety("b", at(2024, 1, 1));
        p.record_activity(ActivityKind::Tatami, None, None, at(2024, 1, 1));
        // ratio 0.5 * 50 + 1 repair * 5 = 30
        let visual = VesselVisual::compute(&p, at(2024, 1, 1));
        assert_eq!(visual.gold_intensity, 30.0);
    }

    #[test]
    fn patina_scales_with_age() {
        let p = Profile::new_at("local", at(2024, 1, 1));
        let visual = VesselVisual::compute(&p, at(2024, 1, 11));
        assert_eq!(visual.patina, 20.0);
    }
}
