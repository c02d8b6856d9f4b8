use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CrackKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrackKind {
    /// User-reported distress, carries free text.
    Anxiety,
    /// A missed visit day, generated by the check-in gap scan.
    Absence,
    /// Reserved for future event sources.
    Struggle,
}

impl CrackKind {
    pub fn all() -> &'static [CrackKind] {
        &[CrackKind::Anxiety, CrackKind::Absence, CrackKind::Struggle]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrackKind::Anxiety => "anxiety",
            CrackKind::Absence => "absence",
            CrackKind::Struggle => "struggle",
        }
    }
}

impl fmt::Display for CrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CrackKind {
    type Err = crate::error::KintsugiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anxiety" => Ok(CrackKind::Anxiety),
            "absence" => Ok(CrackKind::Absence),
            "struggle" => Ok(CrackKind::Struggle),
            _ => Err(crate::error::KintsugiError::InvalidCrackKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Morita-style action journaling ("the garden").
    Garden,
    /// Naikan-style reflective Q&A ("the study").
    Study,
    /// Zen breathing / koan session ("the tatami room").
    Tatami,
}

impl ActivityKind {
    pub fn all() -> &'static [ActivityKind] {
        &[
            ActivityKind::Garden,
            ActivityKind::Study,
            ActivityKind::Tatami,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Garden => "garden",
            ActivityKind::Study => "study",
            ActivityKind::Tatami => "tatami",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = crate::error::KintsugiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "garden" => Ok(ActivityKind::Garden),
            "study" => Ok(ActivityKind::Study),
            "tatami" => Ok(ActivityKind::Tatami),
            _ => Err(crate::error::KintsugiError::InvalidActivityKind(
                s.to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Lang
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    #[default]
    En,
    Ja,
}

impl Lang {
    pub fn as_str(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ja => "ja",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Lang {
    type Err = crate::error::KintsugiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Lang::En),
            "ja" => Ok(Lang::Ja),
            _ => Err(crate::error::KintsugiError::InvalidLanguage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
