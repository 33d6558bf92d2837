use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use tokio::sync::oneshot;

use super::*;

/// Verifier that answers with a fixed result and counts calls.
struct Counting {
    answer: Result<bool, VerifyError>,
    calls: Cell<usize>,
    levels: RefCell<Vec<AccessLevel>>,
}

impl Counting {
    fn new(answer: Result<bool, VerifyError>) -> Self {
        Self { answer, calls: Cell::new(0), levels: RefCell::new(Vec::new()) }
    }
}

impl Verifier for Counting {
    async fn verify(&self, level: AccessLevel, _token: &str) -> Result<bool, VerifyError> {
        self.calls.set(self.calls.get() + 1);
        self.levels.borrow_mut().push(level);
        self.answer.clone()
    }
}

/// Verifier whose answers are released by the test, in any order.
struct Scripted {
    pending: RefCell<VecDeque<oneshot::Receiver<Result<bool, VerifyError>>>>,
}

impl Verifier for Scripted {
    async fn verify(&self, _level: AccessLevel, _token: &str) -> Result<bool, VerifyError> {
        let Some(rx) = self.pending.borrow_mut().pop_front() else {
            return Err(VerifyError::Unreachable("no scripted answer".to_owned()));
        };
        rx.await.unwrap_or_else(|_| Err(VerifyError::Unreachable("dropped".to_owned())))
    }
}

// =============================================================================
// GuardMachine
// =============================================================================

#[test]
fn machine_starts_unverified() {
    let machine = GuardMachine::new();
    assert_eq!(machine.phase(), GuardPhase::Unverified);
    assert!(!machine.phase().renders_children());
}

#[test]
fn empty_token_denies_without_ticket() {
    let mut machine = GuardMachine::new();
    assert_eq!(machine.begin(""), Begin::Denied);
    assert_eq!(machine.phase(), GuardPhase::Denied(DenyReason::Unauthenticated));
}

#[test]
fn token_moves_to_verifying() {
    let mut machine = GuardMachine::new();
    let Begin::Verify(ticket) = machine.begin("abc") else {
        panic!("expected a verification ticket");
    };
    assert_eq!(ticket.token(), "abc");
    assert_eq!(machine.phase(), GuardPhase::Verifying);
    assert!(!machine.phase().renders_children());
}

#[test]
fn resolve_maps_outcomes() {
    for (outcome, expected) in [
        (Ok(true), GuardPhase::Authorized),
        (Ok(false), GuardPhase::Denied(DenyReason::VerificationFailed)),
        (Err(VerifyError::Status(500)), GuardPhase::Denied(DenyReason::VerificationUnreachable)),
    ] {
        let mut machine = GuardMachine::new();
        let Begin::Verify(ticket) = machine.begin("tok") else {
            panic!("expected a verification ticket");
        };
        assert!(machine.resolve(&ticket, outcome));
        assert_eq!(machine.phase(), expected);
    }
}

#[test]
fn stale_ticket_is_discarded() {
    let mut machine = GuardMachine::new();
    let Begin::Verify(old) = machine.begin("old") else {
        panic!("expected a verification ticket");
    };
    let Begin::Verify(new) = machine.begin("new") else {
        panic!("expected a verification ticket");
    };

    assert!(machine.resolve(&new, Ok(true)));
    assert!(!machine.resolve(&old, Ok(false)));
    assert_eq!(machine.phase(), GuardPhase::Authorized);
}

#[test]
fn reissued_same_token_discards_earlier_ticket() {
    let mut machine = GuardMachine::new();
    let Begin::Verify(first) = machine.begin("same") else {
        panic!("expected a verification ticket");
    };
    let Begin::Verify(second) = machine.begin("same") else {
        panic!("expected a verification ticket");
    };
    assert!(!machine.resolve(&first, Ok(true)));
    assert_eq!(machine.phase(), GuardPhase::Verifying);
    assert!(machine.resolve(&second, Ok(false)));
}

#[test]
fn logout_during_flight_ignores_late_confirmation() {
    let mut machine = GuardMachine::new();
    let Begin::Verify(ticket) = machine.begin("tok") else {
        panic!("expected a verification ticket");
    };
    machine.begin("");
    assert!(!machine.resolve(&ticket, Ok(true)));
    assert_eq!(machine.phase(), GuardPhase::Denied(DenyReason::Unauthenticated));
}

#[test]
fn cancel_drops_pending_result() {
    let mut machine = GuardMachine::new();
    let Begin::Verify(ticket) = machine.begin("tok") else {
        panic!("expected a verification ticket");
    };
    machine.cancel();
    assert!(!machine.resolve(&ticket, Ok(true)));
    assert_eq!(machine.phase(), GuardPhase::Unverified);
}

// =============================================================================
// RouteGuard scenarios
// =============================================================================

#[tokio::test]
async fn no_token_denies_with_zero_calls() {
    let guard = RouteGuard::user(Counting::new(Ok(true)));
    let phase = guard.evaluate("").await;
    assert_eq!(phase, GuardPhase::Denied(DenyReason::Unauthenticated));
    assert_eq!(guard.verifier.calls.get(), 0);
}

#[tokio::test]
async fn confirmed_token_renders_children_after_one_call() {
    let guard = RouteGuard::user(Counting::new(Ok(true)));
    let phase = guard.evaluate("valid").await;
    assert!(phase.renders_children());
    assert_eq!(guard.verifier.calls.get(), 1);
}

#[tokio::test]
async fn explicit_denial_blocks_after_one_call() {
    let guard = RouteGuard::user(Counting::new(Ok(false)));
    let phase = guard.evaluate("valid").await;
    assert_eq!(phase, GuardPhase::Denied(DenyReason::VerificationFailed));
    assert!(!phase.renders_children());
    assert_eq!(guard.verifier.calls.get(), 1);
}

#[tokio::test]
async fn unreachable_server_fails_closed() {
    let guard = RouteGuard::user(Counting::new(Err(VerifyError::Unreachable("refused".to_owned()))));
    let phase = guard.evaluate("valid").await;
    assert_eq!(phase, GuardPhase::Denied(DenyReason::VerificationUnreachable));
}

#[tokio::test]
async fn admin_guard_checks_admin_level() {
    let guard = RouteGuard::admin(Counting::new(Ok(true)));
    guard.evaluate("valid").await;
    assert_eq!(*guard.verifier.levels.borrow(), vec![AccessLevel::Admin]);
}

#[tokio::test]
async fn every_evaluation_issues_a_fresh_call() {
    let guard = RouteGuard::user(Counting::new(Ok(true)));
    guard.evaluate("valid").await;
    guard.evaluate("valid").await;
    assert_eq!(guard.verifier.calls.get(), 2);
}

#[tokio::test]
async fn slow_denial_for_old_token_does_not_evict_new_session() {
    let (old_tx, old_rx) = oneshot::channel();
    let (new_tx, new_rx) = oneshot::channel();
    let guard = RouteGuard::user(Scripted { pending: RefCell::new(VecDeque::from([old_rx, new_rx])) });

    let release = async {
        let _ = new_tx.send(Ok(true));
        tokio::task::yield_now().await;
        let _ = old_tx.send(Ok(false));
    };

    let (old_phase, new_phase, ()) = tokio::join!(guard.evaluate("old"), guard.evaluate("new"), release);

    assert_eq!(new_phase, GuardPhase::Authorized);
    assert_eq!(old_phase, GuardPhase::Authorized);
    assert_eq!(guard.phase(), GuardPhase::Authorized);
}

#[tokio::test]
async fn slow_confirmation_for_old_token_does_not_authorize_new_token() {
    let (old_tx, old_rx) = oneshot::channel();
    let (new_tx, new_rx) = oneshot::channel();
    let guard = RouteGuard::user(Scripted { pending: RefCell::new(VecDeque::from([old_rx, new_rx])) });

    let release = async {
        let _ = new_tx.send(Ok(false));
        tokio::task::yield_now().await;
        let _ = old_tx.send(Ok(true));
    };

    tokio::join!(guard.evaluate("old"), guard.evaluate("new"), release);

    assert_eq!(guard.phase(), GuardPhase::Denied(DenyReason::VerificationFailed));
}
