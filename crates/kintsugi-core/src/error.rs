use thiserror::Error;

#[derive(Debug, Error)]
pub enum KintsugiError {
    #[error("not initialized: run 'kintsugi init'")]
    NotInitialized,

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("profile already exists: {0}")]
    ProfileExists(String),

    #[error("invalid profile id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidProfileId(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("invalid crack kind: {0}")]
    InvalidCrackKind(String),

    #[error("invalid activity kind: {0}")]
    InvalidActivityKind(String),

    #[error("invalid language: {0}")]
    InvalidLanguage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KintsugiError>;
