//! Session guard scenarios against in-memory and file-backed stores

use chrono::{Duration, Utc};
use edumatch_core::SessionConfig;
use edumatch_security::{
    login, logout, DenialReason, FileSessionStore, GuardDecision, MemorySessionStore, Role,
    SessionGuard, SessionRecord, SessionStore,
};
use std::sync::Arc;
use tempfile::TempDir;

fn stored_session(role: Role, hours_ago: i64) -> Arc<MemorySessionStore> {
    let record =
        SessionRecord::with_login_time(role, "user-123", Utc::now() - Duration::hours(hours_ago));
    Arc::new(MemorySessionStore::with_raw(record.to_json().unwrap()))
}

#[test]
fn test_expired_session_is_denied_and_erased() {
    let store = stored_session(Role::SupportUser, 25);
    let guard = SessionGuard::new(store.clone(), &SessionConfig::default());

    let decision = guard.check(None);

    assert_eq!(
        decision,
        GuardDecision::Denied {
            reason: DenialReason::Expired,
            redirect_to: "/login".to_string(),
        }
    );
    assert_eq!(store.read().unwrap(), None);
}

#[test]
fn test_lower_role_is_denied_and_session_kept() {
    let store = stored_session(Role::AdminUser, 1);
    let guard = SessionGuard::new(store.clone(), &SessionConfig::default());

    let decision = guard.check(Some(Role::SuperAdmin));

    assert!(!decision.is_authorized());
    assert_eq!(decision.redirect(), Some("/login"));
    assert_eq!(
        decision.denial_reason(),
        Some(DenialReason::InsufficientRole {
            required: Role::SuperAdmin,
            actual: Role::AdminUser,
        })
    );
    assert!(store.read().unwrap().is_some());
}

#[test]
fn test_higher_role_is_authorized() {
    let store = stored_session(Role::SuperAdmin, 1);
    let guard = SessionGuard::new(store, &SessionConfig::default());

    let decision = guard.check(Some(Role::AdminUser));

    assert!(decision.is_authorized());
    let session = decision.session().unwrap();
    assert_eq!(session.role, Role::SuperAdmin);
    assert_eq!(session.user_id, "user-123");
}

#[test]
fn test_missing_session_redirects_to_login() {
    let guard = SessionGuard::new(MemorySessionStore::new(), &SessionConfig::default());

    let decision = guard.check(None);

    assert_eq!(decision.denial_reason(), Some(DenialReason::NoSession));
    assert_eq!(decision.redirect(), Some("/login"));
}

#[test]
fn test_every_denial_redirects_the_same_way() {
    let config = SessionConfig::default();
    let cases = [
        (MemorySessionStore::new(), None),
        (MemorySessionStore::with_raw("{\"role\":"), None),
        (
            MemorySessionStore::with_raw(
                SessionRecord::with_login_time(
                    Role::SuperAdmin,
                    "u",
                    Utc::now() - Duration::hours(48),
                )
                .to_json()
                .unwrap(),
            ),
            None,
        ),
        (
            MemorySessionStore::with_raw(SessionRecord::new(Role::SupportUser, "u").to_json().unwrap()),
            Some(Role::AdminUser),
        ),
    ];

    for (store, required) in cases {
        let decision = SessionGuard::new(store, &config).check(required);
        assert_eq!(decision.redirect(), Some("/login"));
        assert!(decision.session().is_none());
    }
}

#[test]
fn test_repeated_checks_after_expiry() {
    let store = stored_session(Role::AdminUser, 30);
    let guard = SessionGuard::new(store, &SessionConfig::default());

    assert_eq!(guard.check(None).denial_reason(), Some(DenialReason::Expired));
    assert_eq!(guard.check(None).denial_reason(), Some(DenialReason::NoSession));
}

#[test]
fn test_file_store_login_check_logout() {
    let temp_dir = TempDir::new().unwrap();
    let config = SessionConfig {
        storage_dir: temp_dir.path().join("session"),
        ..SessionConfig::default()
    };
    let store = FileSessionStore::from_config(&config).unwrap();

    login(&store, Role::AdminUser, "teacher-admin-1").unwrap();

    let guard = SessionGuard::new(store.clone(), &config);
    assert!(guard.check(Some(Role::SupportUser)).is_authorized());
    assert!(!guard.check(Some(Role::SuperAdmin)).is_authorized());

    logout(&store).unwrap();
    assert_eq!(guard.check(None).denial_reason(), Some(DenialReason::NoSession));
}

#[test]
fn test_file_store_expired_record_is_deleted() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(temp_dir.path(), "edumatch_session").unwrap();
    let record =
        SessionRecord::with_login_time(Role::SupportUser, "u-5", Utc::now() - Duration::hours(25));
    store.write(&record.to_json().unwrap()).unwrap();

    let guard = SessionGuard::new(store.clone(), &SessionConfig::default());
    assert_eq!(guard.check(None).denial_reason(), Some(DenialReason::Expired));
    assert!(!store.path().exists());
}
