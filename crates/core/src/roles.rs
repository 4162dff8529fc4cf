//! Well-known role names and the per-operation authorization check.
//!
//! Role names must match the CHECK constraint on `users.role` in
//! `crates/db/migrations`.

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Check a caller's role against the role set an operation requires.
///
/// An empty `required` set allows any caller. Otherwise the caller's role
/// must be a member of the set.
pub fn authorize(caller_role: &str, required: &[&str]) -> Result<(), CoreError> {
    if required.is_empty() || required.contains(&caller_role) {
        return Ok(());
    }
    Err(CoreError::Forbidden(format!(
        "Requires one of the roles: {}",
        required.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_set_allows_any_role() {
        assert!(authorize(ROLE_USER, &[]).is_ok());
        assert!(authorize("something-else", &[]).is_ok());
    }

    #[test]
    fn member_role_is_allowed() {
        assert!(authorize(ROLE_ADMIN, &[ROLE_ADMIN]).is_ok());
        assert!(authorize(ROLE_USER, &[ROLE_ADMIN, ROLE_USER]).is_ok());
    }

    #[test]
    fn non_member_role_is_forbidden() {
        let err = authorize(ROLE_USER, &[ROLE_ADMIN]).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }
}
