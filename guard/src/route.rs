//! Route authorization guard.
//!
//! ARCHITECTURE
//! ============
//! `GuardMachine` is the pure state machine; `RouteGuard` pairs it with a
//! [`Verifier`] and drives one evaluation per token change. Components render
//! protected children only in `Authorized`; every other phase shows the same
//! blocking indicator, so a pending check is indistinguishable from a denial.
//!
//! STALENESS
//! =========
//! Each evaluation takes a `Ticket` tagged with a generation counter and the
//! token it was issued for. A result is applied only if its ticket is still
//! the latest one, so a slow response for an old token can never overwrite
//! the state computed for a newer token.

use std::cell::RefCell;

use crate::verify::{AccessLevel, Verifier, VerifyError};

/// Why a guard refused access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// No token in the store; no call was made.
    Unauthenticated,
    /// The server answered `ok: false`.
    VerificationFailed,
    /// Network failure, non-2xx status, or malformed body.
    VerificationUnreachable,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardPhase {
    #[default]
    Unverified,
    Verifying,
    Authorized,
    Denied(DenyReason),
}

impl GuardPhase {
    #[must_use]
    pub fn renders_children(self) -> bool {
        self == Self::Authorized
    }

    #[must_use]
    pub fn is_denied(self) -> bool {
        matches!(self, Self::Denied(_))
    }
}

/// Handle for one in-flight verification call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    token: String,
}

impl Ticket {
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Outcome of starting an evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Begin {
    /// Denied synchronously; no verification call must be issued.
    Denied,
    /// Issue a verification call and report back with this ticket.
    Verify(Ticket),
}

#[derive(Clone, Debug, Default)]
pub struct GuardMachine {
    phase: GuardPhase,
    generation: u64,
    token: String,
}

impl GuardMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> GuardPhase {
        self.phase
    }

    /// Start an evaluation for `token`, superseding any call in flight.
    pub fn begin(&mut self, token: &str) -> Begin {
        self.generation += 1;
        token.clone_into(&mut self.token);

        if token.is_empty() {
            self.phase = GuardPhase::Denied(DenyReason::Unauthenticated);
            return Begin::Denied;
        }

        self.phase = GuardPhase::Verifying;
        Begin::Verify(Ticket { generation: self.generation, token: token.to_owned() })
    }

    /// Apply a verification result. Returns `false` if the ticket is stale and
    /// the result was discarded.
    pub fn resolve(&mut self, ticket: &Ticket, outcome: Result<bool, VerifyError>) -> bool {
        if ticket.generation != self.generation || ticket.token != self.token {
            return false;
        }

        self.phase = match outcome {
            Ok(true) => GuardPhase::Authorized,
            Ok(false) => GuardPhase::Denied(DenyReason::VerificationFailed),
            Err(_) => GuardPhase::Denied(DenyReason::VerificationUnreachable),
        };
        true
    }

    /// Drop any pending result and return to `Unverified` (unmount).
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.token.clear();
        self.phase = GuardPhase::Unverified;
    }
}

/// A guard for one access level, driving a [`GuardMachine`] with a verifier.
///
/// Single-threaded: concurrent evaluations interleave on one task
/// and the staleness rule picks the winner.
#[derive(Debug)]
pub struct RouteGuard<V> {
    level: AccessLevel,
    verifier: V,
    machine: RefCell<GuardMachine>,
}

impl<V: Verifier> RouteGuard<V> {
    pub fn new(level: AccessLevel, verifier: V) -> Self {
        Self { level, verifier, machine: RefCell::new(GuardMachine::new()) }
    }

    pub fn user(verifier: V) -> Self {
        Self::new(AccessLevel::User, verifier)
    }

    pub fn admin(verifier: V) -> Self {
        Self::new(AccessLevel::Admin, verifier)
    }

    #[must_use]
    pub fn level(&self) -> AccessLevel {
        self.level
    }

    #[must_use]
    pub fn phase(&self) -> GuardPhase {
        self.machine.borrow().phase()
    }

    /// Evaluate `token` and return the guard's phase once this call settles.
    ///
    /// The returned phase is the guard's current one, which differs from this
    /// call's own outcome when a newer evaluation superseded it.
    pub async fn evaluate(&self, token: &str) -> GuardPhase {
        let begin = self.machine.borrow_mut().begin(token);
        let Begin::Verify(ticket) = begin else {
            return self.phase();
        };

        let outcome = self.verifier.verify(self.level, ticket.token()).await;
        self.machine.borrow_mut().resolve(&ticket, outcome);
        self.phase()
    }

    pub fn cancel(&self) {
        self.machine.borrow_mut().cancel();
    }
}

#[cfg(test)]
#[path = "route_test.rs"]
mod tests;
