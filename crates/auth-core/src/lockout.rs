// ============================
// crates/auth-core/src/lockout.rs
// ============================
//! Login lockout policy.
use chrono::{DateTime, Duration, Utc};

/// Default number of failed attempts before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout window in seconds (15 minutes)
pub const DEFAULT_LOCKOUT_WINDOW_SECS: i64 = 15 * 60;

/// Lockout decision policy.
///
/// Lock state is never stored; it is derived from the failure counter and the
/// last-failure timestamp on every check, so a lock expires purely by
/// wall-clock elapse.
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    /// Maximum number of failed attempts before lockout
    pub max_attempts: u32,
    /// Duration of the lockout window
    pub window: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window: Duration::seconds(DEFAULT_LOCKOUT_WINDOW_SECS),
        }
    }
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }

    /// Whether an account with the given failure state is currently locked.
    ///
    /// Pure function of its inputs; re-evaluated on every login attempt.
    pub fn is_locked(
        &self,
        failed_login_count: u32,
        last_failed_login_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        if failed_login_count < self.max_attempts {
            return false;
        }
        match last_failed_login_at {
            None => false,
            Some(last) => now < last + self.window,
        }
    }
}
