/// Quiet period after which a partial tap sequence is forgotten.
pub const TAP_WINDOW_MS: f64 = 400.0;
pub const TAPS_TO_DELETE: u32 = 3;
pub const SPEAK_COOLDOWN_MS: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Counting(u32),
    Triggered,
}

/// Counts rapid taps on the inspection card.
///
/// Every tap both increments the count and restarts the quiet-period timer,
/// so taps keep accumulating for as long as each follows the previous one
/// within [`TAP_WINDOW_MS`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TapCounter {
    count: u32,
    last_tap_ms: Option<f64>,
}

impl TapCounter {
    pub fn register(&mut self, now_ms: f64) -> TapOutcome {
        let expired = self
            .last_tap_ms
            .is_none_or(|last| now_ms - last >= TAP_WINDOW_MS);
        if expired {
            self.count = 0;
        }

        self.count += 1;
        self.last_tap_ms = Some(now_ms);

        if self.count >= TAPS_TO_DELETE {
            self.reset();
            TapOutcome::Triggered
        } else {
            TapOutcome::Counting(self.count)
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A lockout that lets an action fire at most once per period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    period_ms: f64,
    ready_at_ms: Option<f64>,
}

impl Cooldown {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            ready_at_ms: None,
        }
    }

    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if self.ready_at_ms.is_some_and(|ready| now_ms < ready) {
            return false;
        }

        self.ready_at_ms = Some(now_ms + self.period_ms);
        true
    }
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(SPEAK_COOLDOWN_MS)
    }
}
