use crate::error::{KintsugiError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const KINTSUGI_DIR: &str = ".kintsugi";
pub const PROFILES_DIR: &str = ".kintsugi/profiles";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn kintsugi_dir(root: &Path) -> PathBuf {
    root.join(KINTSUGI_DIR)
}

pub fn profiles_dir(root: &Path) -> PathBuf {
    root.join(PROFILES_DIR)
}

pub fn profile_path(root: &Path, id: &str) -> PathBuf {
    profiles_dir(root).join(format!("{id}.yaml"))
}

// ---------------------------------------------------------------------------
// Profile id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Profile ids double as file names, so the same slug rules apply.
pub fn validate_profile_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(KintsugiError::InvalidProfileId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        for id in ["local", "a", "user-42", "9f3b2c1d"] {
            validate_profile_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_ids() {
        for id in ["", "-leading", "trailing-", "has spaces", "UPPER", "a_b"] {
            assert!(validate_profile_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/data");
        assert_eq!(
            profile_path(root, "local"),
            PathBuf::from("/tmp/data/.kintsugi/profiles/local.yaml")
        );
    }
}
