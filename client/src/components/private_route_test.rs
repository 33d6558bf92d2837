use guard::countdown::redirect_path;
use guard::{AuthState, Role, UserSummary};

use super::*;

#[test]
fn user_guard_redirects_to_login() {
    assert_eq!(redirect_path(redirect_target(AccessLevel::User)), "/login");
}

#[test]
fn admin_guard_redirects_home() {
    assert_eq!(redirect_path(redirect_target(AccessLevel::Admin)), "/");
}

#[test]
fn first_run_always_verifies() {
    assert!(token_changed(None, "tok"));
    assert!(token_changed(None, ""));
}

#[test]
fn same_token_does_not_reverify() {
    assert!(!token_changed(Some("tok"), "tok"));
}

#[test]
fn new_or_cleared_token_reverifies() {
    assert!(token_changed(Some("tok"), "other"));
    assert!(token_changed(Some("tok"), ""));
    assert!(token_changed(Some(""), "tok"));
}

#[test]
fn profile_update_keeps_verdict() {
    let user = UserSummary {
        name: "Dana".to_owned(),
        email: "dana@example.com".to_owned(),
        phone: "555".to_owned(),
        address: "4 Oak".to_owned(),
        role: Role::User,
    };
    let before = AuthState::new(user.clone(), "tok");
    let after = AuthState::new(UserSummary { name: "Dana R".to_owned(), ..user }, "tok");

    assert_ne!(before, after);
    assert!(!token_changed(Some(&before.token), &after.token));
}
