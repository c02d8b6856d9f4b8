pub mod activities;
pub mod anxiety;
pub mod checkin;
pub mod koan;
pub mod profiles;
pub mod sync;
pub mod vessel;

use crate::error::AppError;
use crate::limit::{MUTATION_LIMIT, MUTATION_WINDOW};
use crate::state::AppState;

/// Per-profile rate gate for mutation endpoints.
pub(crate) fn check_rate(app: &AppState, profile_id: &str, op: &str) -> Result<(), AppError> {
    let key = format!("{op}:{profile_id}");
    let count = app.limiter.increment_with_ttl(&key, MUTATION_WINDOW);
    if count > MUTATION_LIMIT {
        return Err(AppError::rate_limited(format!(
            "too many {op} requests for profile '{profile_id}'"
        )));
    }
    Ok(())
}
