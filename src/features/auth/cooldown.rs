//! Deterministic resend gate for the OTP step: a fixed cooldown window plus a
//! bounded attempt counter. Time is injected as ticks so the policy stays a
//! pure state machine; the OTP page drives it from a one-second interval.

/// Seconds a user must wait between resends.
pub const RESEND_COOLDOWN_SECONDS: u32 = 60;
/// Resends allowed before the gate closes for good.
pub const MAX_RESEND_ATTEMPTS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResendState {
    Ready,
    Cooling { remaining: u32 },
}

/// Why a resend was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResendDenied {
    Cooling { remaining: u32 },
    AttemptsExhausted,
}

#[derive(Clone, Debug)]
pub struct ResendPolicy {
    window: u32,
    max_attempts: u32,
    remaining: u32,
    attempts: u32,
}

impl Default for ResendPolicy {
    fn default() -> Self {
        Self::new(RESEND_COOLDOWN_SECONDS, MAX_RESEND_ATTEMPTS)
    }
}

impl ResendPolicy {
    pub fn new(window: u32, max_attempts: u32) -> Self {
        Self {
            window,
            max_attempts,
            remaining: 0,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ResendState {
        if self.remaining == 0 {
            ResendState::Ready
        } else {
            ResendState::Cooling {
                remaining: self.remaining,
            }
        }
    }

    /// Whether a resend would currently be allowed. Exhausted attempts win
    /// over the cooldown so the user sees the terminal reason.
    pub fn check(&self) -> Result<(), ResendDenied> {
        if self.attempts >= self.max_attempts {
            return Err(ResendDenied::AttemptsExhausted);
        }
        match self.state() {
            ResendState::Ready => Ok(()),
            ResendState::Cooling { remaining } => Err(ResendDenied::Cooling { remaining }),
        }
    }

    /// Records a successful resend: consumes an attempt and restarts the
    /// cooldown window.
    pub fn record_send(&mut self) {
        self.attempts += 1;
        self.remaining = self.window;
    }

    /// Advances time by one tick.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_cooling(&self) -> bool {
        self.remaining > 0
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_RESEND_ATTEMPTS, ResendDenied, ResendPolicy, ResendState};

    #[test]
    fn starts_ready() {
        let policy = ResendPolicy::default();
        assert_eq!(policy.state(), ResendState::Ready);
        assert_eq!(policy.check(), Ok(()));
        assert_eq!(policy.attempts(), 0);
    }

    #[test]
    fn send_enters_cooldown_for_the_full_window() {
        let mut policy = ResendPolicy::default();
        policy.record_send();

        assert_eq!(policy.state(), ResendState::Cooling { remaining: 60 });
        assert_eq!(policy.check(), Err(ResendDenied::Cooling { remaining: 60 }));
    }

    #[test]
    fn cooldown_reaches_ready_after_window_ticks() {
        let mut policy = ResendPolicy::new(60, MAX_RESEND_ATTEMPTS);
        policy.record_send();

        for _ in 0..59 {
            policy.tick();
        }
        assert!(policy.is_cooling());

        policy.tick();
        assert_eq!(policy.state(), ResendState::Ready);
        assert_eq!(policy.check(), Ok(()));
    }

    #[test]
    fn ticks_past_zero_are_harmless() {
        let mut policy = ResendPolicy::new(2, 5);
        policy.record_send();
        for _ in 0..10 {
            policy.tick();
        }
        assert_eq!(policy.state(), ResendState::Ready);
    }

    #[test]
    fn attempts_exhaust_regardless_of_cooldown() {
        let mut policy = ResendPolicy::new(1, 5);
        for _ in 0..5 {
            assert_eq!(policy.check(), Ok(()));
            policy.record_send();
            policy.tick();
        }

        // Back at Ready, but the attempt budget is spent.
        assert_eq!(policy.state(), ResendState::Ready);
        assert_eq!(policy.check(), Err(ResendDenied::AttemptsExhausted));

        // Still exhausted while cooling.
        policy.record_send();
        assert_eq!(policy.check(), Err(ResendDenied::AttemptsExhausted));
    }

    #[test]
    fn each_send_resets_the_window() {
        let mut policy = ResendPolicy::new(60, 5);
        policy.record_send();
        for _ in 0..60 {
            policy.tick();
        }
        policy.record_send();

        assert_eq!(policy.state(), ResendState::Cooling { remaining: 60 });
        assert_eq!(policy.attempts(), 2);
    }
}
