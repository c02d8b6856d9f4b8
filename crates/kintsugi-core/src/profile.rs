use crate::error::{KintsugiError, Result};
use crate::io;
use crate::paths;
use crate::types::{ActivityKind, CrackKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Crack
// ---------------------------------------------------------------------------

/// A recorded rupture event: an anxiety report or a missed visit day.
/// Cracks are append-only; `repaired` flips to true at most once and the
/// insertion order is chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crack {
    pub id: String,
    pub kind: CrackKind,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub repaired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repaired_date: Option<DateTime<Utc>>,
}

impl Crack {
    pub fn new(kind: CrackKind, date: DateTime<Utc>, text: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            date,
            text,
            repaired: false,
            repaired_date: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// Mode-specific counters attached to an activity. All unsigned: a negative
/// increment cannot be expressed, which closes the unvalidated-actionCount
/// hole in the original design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_answered: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breathing_minutes: Option<u32>,
}

/// Completion of one therapy-mode session. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ActivityDetails>,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Aggregate counters. All monotone non-decreasing except `current_streak`,
/// which resets to 1 when a visit gap is detected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_visits: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub garden_actions: u32,
    pub study_sessions: u32,
    pub tatami_sessions: u32,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_visit: DateTime<Utc>,
    #[serde(default)]
    pub cracks: Vec<Crack>,
    #[serde(default)]
    pub total_repairs: u32,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub stats: Stats,
}

fn default_version() -> u32 {
    1
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self::new_at(id, Utc::now())
    }

    /// Construct with an explicit creation timestamp (injectable for tests).
    /// The creation itself counts as the first visit.
    pub fn new_at(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            version: 1,
            id: id.into(),
            created_at: now,
            last_visit: now,
            cracks: Vec::new(),
            total_repairs: 0,
            activities: Vec::new(),
            stats: Stats {
                total_visits: 1,
                current_streak: 1,
                longest_streak: 1,
                ..Stats::default()
            },
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, id: &str) -> Result<Self> {
        paths::validate_profile_id(id)?;
        let path = paths::profile_path(root, id);
        if path.exists() {
            return Err(KintsugiError::ProfileExists(id.to_string()));
        }
        let profile = Profile::new(id);
        profile.save(root)?;
        Ok(profile)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        paths::validate_profile_id(id)?;
        let path = paths::profile_path(root, id);
        if !path.exists() {
            return Err(KintsugiError::ProfileNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let profile: Profile = serde_yaml::from_str(&data)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::profile_path(root, &self.id);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Profile>> {
        let dir = paths::profiles_dir(root);
        if !dir.exists() {
            return Err(KintsugiError::NotInitialized);
        }
        let mut profiles = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let data = std::fs::read_to_string(&path)?;
            let profile: Profile = serde_yaml::from_str(&data)?;
            profile.validate()?;
            profiles.push(profile);
        }
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }

    // ---------------------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------------------

    /// Fail fast on malformed input instead of letting the engine produce
    /// corrupted output. Checked on every load.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(KintsugiError::InvalidProfile("empty id".to_string()));
        }
        let repaired = self.cracks.iter().filter(|c| c.repaired).count() as u32;
        if repaired != self.total_repairs {
            return Err(KintsugiError::InvalidProfile(format!(
                "total_repairs is {} but {} cracks are repaired",
                self.total_repairs, repaired
            )));
        }
        for crack in &self.cracks {
            if crack.repaired && crack.repaired_date.is_none() {
                return Err(KintsugiError::InvalidProfile(format!(
                    "repaired crack {} has no repaired_date",
                    crack.id
                )));
            }
            if !crack.repaired && crack.repaired_date.is_some() {
                return Err(KintsugiError::InvalidProfile(format!(
                    "unrepaired crack {} has a repaired_date",
                    crack.id
                )));
            }
        }
        Ok(())
    }

    /// Oldest unrepaired crack, if any. FIFO repair order.
    pub fn next_repairable(&self) -> Option<&Crack> {
        self.cracks.iter().find(|c| !c.repaired)
    }

    pub fn repaired_count(&self) -> usize {
        self.cracks.iter().filter(|c| c.repaired).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn profile_roundtrip() {
        let dir = TempDir::new().unwrap();
        let profile = Profile::create(dir.path(), "local").unwrap();
        assert_eq!(profile.stats.total_visits, 1);

        let loaded = Profile::load(dir.path(), "local").unwrap();
        assert_eq!(loaded.id, "local");
        assert_eq!(loaded.stats.current_streak, 1);
        assert!(loaded.cracks.is_empty());
    }

    #[test]
    fn create_twice_conflicts() {
        let dir = TempDir::new().unwrap();
        Profile::create(dir.path(), "local").unwrap();
        assert!(matches!(
            Profile::create(dir.path(), "local"),
            Err(KintsugiError::ProfileExists(_))
        ));
    }

    #[test]
    fn load_missing_profile() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Profile::load(dir.path(), "nobody"),
            Err(KintsugiError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn load_rejects_bad_id() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Profile::load(dir.path(), "../escape"),
            Err(KintsugiError::InvalidProfileId(_))
        ));
    }

    #[test]
    fn list_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Profile::list(dir.path()),
            Err(KintsugiError::NotInitialized)
        ));
    }

    #[test]
    fn list_sorted_by_id() {
        let dir = TempDir::new().unwrap();
        Profile::create(dir.path(), "beta").unwrap();
        Profile::create(dir.path(), "alpha").unwrap();
        let profiles = Profile::list(dir.path()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "alpha");
        assert_eq!(profiles[1].id, "beta");
    }

    #[test]
    fn list_rejects_corrupt_profile() {
        let dir = TempDir::new().unwrap();
        Profile::create(dir.path(), "good").unwrap();

        // A stored profile whose repair counter disagrees with its cracks
        // must fail fast from list(), same as from load().
        let mut bad = Profile::new("bad");
        bad.total_repairs = 5;
        let data = serde_yaml::to_string(&bad).unwrap();
        std::fs::write(dir.path().join(".kintsugi/profiles/bad.yaml"), data).unwrap();

        assert!(matches!(
            Profile::list(dir.path()),
            Err(KintsugiError::InvalidProfile(_))
        ));
    }

    #[test]
    fn validate_catches_repair_count_mismatch() {
        let mut profile = Profile::new("local");
        profile.total_repairs = 3;
        assert!(matches!(
            profile.validate(),
            Err(KintsugiError::InvalidProfile(_))
        ));
    }

    #[test]
    fn validate_catches_repaired_without_date() {
        let mut profile = Profile::new("local");
        let mut crack = Crack::new(CrackKind::Anxiety, Utc::now(), None);
        crack.repaired = true;
        profile.cracks.push(crack);
        profile.total_repairs = 1;
        assert!(matches!(
            profile.validate(),
            Err(KintsugiError::InvalidProfile(_))
        ));
    }
}
