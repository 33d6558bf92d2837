//! Redirect countdown shown when a guard denies access.
//!
//! The countdown starts at [`REDIRECT_SECONDS`], drops by one per elapsed
//! second, and emits exactly one [`Redirect`] when it reaches zero. The
//! redirect carries the denied location so the target page can send the user
//! back after signing in. Timer ownership (and cancelling it on unmount) is
//! the caller's job; see `runtime` for the tokio driver.

pub const REDIRECT_SECONDS: u32 = 3;
pub const TICK_MS: u32 = 1000;
pub const DEFAULT_REDIRECT_TARGET: &str = "login";

/// Absolute path for a redirect target: `"register"` and `"/register"` both
/// become `/register`, and an empty target is the site root.
#[must_use]
pub fn redirect_path(target: &str) -> String {
    format!("/{}", target.trim().trim_start_matches('/'))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    /// Location the user was denied, passed along as navigation state.
    pub from: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Seconds left after this tick.
    Tick(u32),
    Redirect(Redirect),
}

/// Programmatic navigation, provided by the router or the CLI.
pub trait Navigator {
    fn navigate(&self, path: &str, from: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, path: &str, from: &str) {
        (**self).navigate(path, from);
    }
}

#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    carry_ms: u32,
    path: String,
    from: String,
    finished: bool,
}

impl Countdown {
    pub fn new(target: &str, from: impl Into<String>) -> Self {
        Self::with_seconds(REDIRECT_SECONDS, target, from)
    }

    pub fn with_seconds(seconds: u32, target: &str, from: impl Into<String>) -> Self {
        Self { remaining: seconds, carry_ms: 0, path: redirect_path(target), from: from.into(), finished: false }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// One whole second elapsed. Returns `None` once the redirect has fired.
    pub fn tick(&mut self) -> Option<Step> {
        if self.finished {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Some(Step::Tick(self.remaining));
        }
        self.finished = true;
        Some(Step::Redirect(Redirect { path: self.path.clone(), from: self.from.clone() }))
    }

    /// Account for `elapsed_ms` of wall-clock time, emitting a step for every
    /// whole second crossed.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<Step> {
        self.carry_ms = self.carry_ms.saturating_add(elapsed_ms);
        let mut steps = Vec::new();
        while self.carry_ms >= TICK_MS && !self.finished {
            self.carry_ms -= TICK_MS;
            steps.extend(self.tick());
        }
        steps
    }
}

/// Perform the navigation for any redirect among `steps`.
///
/// Returns `true` if a redirect was dispatched.
pub fn dispatch<N: Navigator>(steps: &[Step], navigator: &N) -> bool {
    let mut fired = false;
    for step in steps {
        if let Step::Redirect(redirect) = step {
            navigator.navigate(&redirect.path, &redirect.from);
            fired = true;
        }
    }
    fired
}

#[cfg(test)]
#[path = "countdown_test.rs"]
mod tests;
