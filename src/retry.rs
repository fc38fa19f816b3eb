//! Bounded retry counter for device-issued retry signals.

/// Default number of retries allowed per top-level operation.
pub const DEFAULT_MAX_RETRIES: u8 = 5;

/// Counts retry signals within one top-level operation.
///
/// Only a full session reset clears the counter; the soft reset performed when
/// a flush completes leaves it untouched so that a retry chain spanning several
/// flushes still terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u8,
    max_retries: u8,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self::new(DEFAULT_MAX_RETRIES) }
}

impl RetryPolicy {
    /// Create a policy allowing `max_retries` retries.
    #[must_use]
    pub const fn new(max_retries: u8) -> Self {
        Self {
            attempts: 0,
            max_retries,
        }
    }

    /// Retries consumed so far.
    #[must_use]
    pub const fn attempts(&self) -> u8 { self.attempts }

    /// Configured cap.
    #[must_use]
    pub const fn max_retries(&self) -> u8 { self.max_retries }

    /// Whether the cap has been reached.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool { self.attempts >= self.max_retries }

    /// Record a retry if the cap allows one.
    ///
    /// # Examples
    ///
    /// ```
    /// use mooltilink::retry::RetryPolicy;
    ///
    /// let mut policy = RetryPolicy::new(1);
    /// assert!(policy.try_retry());
    /// assert!(!policy.try_retry());
    /// assert_eq!(policy.attempts(), 1);
    /// ```
    pub fn try_retry(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.attempts += 1;
        true
    }

    /// Forget all recorded retries.
    pub fn reset(&mut self) { self.attempts = 0; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_five_retries_by_default() {
        let mut policy = RetryPolicy::default();

        let granted = (0..7).filter(|_| policy.try_retry()).count();

        assert_eq!(granted, 5);
        assert!(policy.is_exhausted());
    }

    #[test]
    fn reset_restores_full_budget() {
        let mut policy = RetryPolicy::new(2);
        assert!(policy.try_retry());
        assert!(policy.try_retry());

        policy.reset();

        assert_eq!(policy.attempts(), 0);
        assert!(policy.try_retry());
    }

    #[test]
    fn zero_cap_never_retries() {
        let mut policy = RetryPolicy::new(0);
        assert!(!policy.try_retry());
    }
}
