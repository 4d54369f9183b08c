//! Session lifecycle: writing a record at login and removing it at logout

use super::storage::SessionStore;
use super::types::SessionRecord;
use crate::auth::Role;
use edumatch_core::{validation_error, EdumatchResult};
use tracing::info;

/// Write a fresh session record for `user_id`, replacing any existing one
pub fn login<S: SessionStore + ?Sized>(
    store: &S,
    role: Role,
    user_id: &str,
) -> EdumatchResult<SessionRecord> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(validation_error!("User id must not be empty", "user_id", "session"));
    }

    let record = SessionRecord::new(role, user_id);
    store.write(&record.to_json()?)?;

    info!(user_id = %record.user_id, role = %record.role, "Session started");
    Ok(record)
}

/// Remove the stored session record; logging out twice is fine
pub fn logout<S: SessionStore + ?Sized>(store: &S) -> EdumatchResult<()> {
    store.clear()?;
    info!("Session cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemorySessionStore;

    #[test]
    fn test_login_writes_parseable_record() {
        let store = MemorySessionStore::new();
        let record = login(&store, Role::AdminUser, " u-9 ").unwrap();

        assert_eq!(record.user_id, "u-9");
        let raw = store.read().unwrap().unwrap();
        assert_eq!(SessionRecord::from_json(&raw).unwrap(), record);
    }

    #[test]
    fn test_login_rejects_blank_user() {
        let store = MemorySessionStore::new();
        let err = login(&store, Role::SupportUser, "  ").unwrap_err();

        assert_eq!(err.field(), Some("user_id"));
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = MemorySessionStore::new();
        login(&store, Role::SuperAdmin, "u-1").unwrap();

        logout(&store).unwrap();
        logout(&store).unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
