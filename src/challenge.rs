use crate::word::spelling_matches;

pub const MEMORIZE_SECONDS: u32 = 10;
pub const SPELL_SECONDS: u32 = 8;
/// Coins awarded for a correct spelling.
pub const CHALLENGE_REWARD: u32 = 5;
pub const WRONG_SPELLING_MESSAGE: &str = "❌ 拼写错误，再试试";

/// Stage of the memorize-then-spell challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The word is shown and a countdown runs before it is hidden.
    Memorize,
    /// The word is hidden and must be typed before the countdown runs out.
    Spell,
    /// Finished; every further input is ignored.
    Closed(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Timeout,
    Cancelled,
}

/// The countdown a phase owns. At most one is live at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Memorize,
    Spell,
}

/// What the caller has to do after feeding the challenge an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing beyond refreshing the countdown display.
    Stay,
    /// Drop the memorize countdown, clear the answer field and start the
    /// spell countdown.
    EnterSpell,
    /// Wrong answer; the inline message is set and the countdown keeps going.
    Rejected,
    /// Drop every countdown; the challenge is over.
    Finished(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    target: String,
    phase: Phase,
    memorize_seconds_left: u32,
    spell_seconds_left: u32,
    message: Option<&'static str>,
}

impl Challenge {
    pub fn start(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            phase: Phase::Memorize,
            memorize_seconds_left: MEMORIZE_SECONDS,
            spell_seconds_left: SPELL_SECONDS,
            message: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Closed(_))
    }

    pub fn memorize_seconds_left(&self) -> u32 {
        self.memorize_seconds_left
    }

    pub fn spell_seconds_left(&self) -> u32 {
        self.spell_seconds_left
    }

    /// Seconds shown next to the active stage.
    pub fn seconds_left(&self) -> u32 {
        match self.phase {
            Phase::Memorize => self.memorize_seconds_left,
            Phase::Spell => self.spell_seconds_left,
            Phase::Closed(_) => 0,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// The countdown that should be running right now.
    pub fn countdown(&self) -> Option<Countdown> {
        match self.phase {
            Phase::Memorize => Some(Countdown::Memorize),
            Phase::Spell => Some(Countdown::Spell),
            Phase::Closed(_) => None,
        }
    }

    /// One second has elapsed on the live countdown.
    pub fn tick(&mut self) -> Transition {
        match self.phase {
            Phase::Memorize => {
                self.memorize_seconds_left = self.memorize_seconds_left.saturating_sub(1);
                if self.memorize_seconds_left == 0 {
                    self.enter_spell()
                } else {
                    Transition::Stay
                }
            }
            Phase::Spell => {
                self.spell_seconds_left = self.spell_seconds_left.saturating_sub(1);
                if self.spell_seconds_left == 0 {
                    self.finish(Outcome::Timeout)
                } else {
                    Transition::Stay
                }
            }
            Phase::Closed(_) => Transition::Stay,
        }
    }

    /// Skips the rest of the memorize countdown.
    pub fn start_spelling(&mut self) -> Transition {
        match self.phase {
            Phase::Memorize => self.enter_spell(),
            _ => Transition::Stay,
        }
    }

    pub fn submit(&mut self, input: &str) -> Transition {
        if self.phase != Phase::Spell {
            return Transition::Stay;
        }

        if spelling_matches(&self.target, input) {
            self.finish(Outcome::Success)
        } else {
            self.message = Some(WRONG_SPELLING_MESSAGE);
            Transition::Rejected
        }
    }

    /// Enter advances the memorize stage and submits during the spell stage.
    pub fn enter(&mut self, input: &str) -> Transition {
        match self.phase {
            Phase::Memorize => self.start_spelling(),
            Phase::Spell => self.submit(input),
            Phase::Closed(_) => Transition::Stay,
        }
    }

    pub fn cancel(&mut self) -> Transition {
        match self.phase {
            Phase::Closed(_) => Transition::Stay,
            _ => self.finish(Outcome::Cancelled),
        }
    }

    fn enter_spell(&mut self) -> Transition {
        self.memorize_seconds_left = 0;
        self.spell_seconds_left = SPELL_SECONDS;
        self.message = None;
        self.phase = Phase::Spell;
        Transition::EnterSpell
    }

    fn finish(&mut self, outcome: Outcome) -> Transition {
        self.phase = Phase::Closed(outcome);
        Transition::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memorize_countdown_enters_spell_once() {
        let mut challenge = Challenge::start("diligent");
        let transitions: Vec<_> = (0..MEMORIZE_SECONDS).map(|_| challenge.tick()).collect();

        let entered = transitions
            .iter()
            .filter(|transition| **transition == Transition::EnterSpell)
            .count();
        assert_eq!(entered, 1);
        assert_eq!(transitions.last(), Some(&Transition::EnterSpell));
        assert_eq!(challenge.phase(), Phase::Spell);
        assert_eq!(challenge.spell_seconds_left(), SPELL_SECONDS);
        assert_eq!(challenge.countdown(), Some(Countdown::Spell));
    }

    #[test]
    fn start_spelling_skips_the_countdown() {
        let mut challenge = Challenge::start("diligent");
        challenge.tick();

        assert_eq!(challenge.start_spelling(), Transition::EnterSpell);
        assert_eq!(challenge.seconds_left(), SPELL_SECONDS);
        assert_eq!(challenge.start_spelling(), Transition::Stay);
    }

    #[test]
    fn correct_spelling_succeeds() {
        let mut challenge = Challenge::start("diligent");
        challenge.start_spelling();

        assert_eq!(
            challenge.submit("Diligent"),
            Transition::Finished(Outcome::Success)
        );
        assert_eq!(challenge.countdown(), None);
    }

    #[test]
    fn wrong_spelling_keeps_the_clock_running() {
        let mut challenge = Challenge::start("diligent");
        challenge.start_spelling();
        challenge.tick();
        challenge.tick();

        assert_eq!(challenge.submit("dilignet"), Transition::Rejected);
        assert_eq!(challenge.phase(), Phase::Spell);
        assert_eq!(challenge.message(), Some(WRONG_SPELLING_MESSAGE));
        assert_eq!(challenge.spell_seconds_left(), SPELL_SECONDS - 2);
    }

    #[test]
    fn spell_countdown_times_out_silently() {
        let mut challenge = Challenge::start("diligent");
        challenge.start_spelling();

        for _ in 1..SPELL_SECONDS {
            assert_eq!(challenge.tick(), Transition::Stay);
        }

        assert_eq!(challenge.tick(), Transition::Finished(Outcome::Timeout));
        assert_eq!(challenge.message(), None);
        assert_eq!(challenge.tick(), Transition::Stay);
    }

    #[test]
    fn enter_is_routed_by_phase() {
        let mut challenge = Challenge::start("ox");

        assert_eq!(challenge.enter("ignored"), Transition::EnterSpell);
        assert_eq!(challenge.enter("oxx"), Transition::Rejected);
        assert_eq!(challenge.enter(" OX "), Transition::Finished(Outcome::Success));
        assert_eq!(challenge.enter("ox"), Transition::Stay);
    }

    #[test]
    fn submit_is_ignored_while_memorizing() {
        let mut challenge = Challenge::start("ox");
        assert_eq!(challenge.submit("ox"), Transition::Stay);
        assert_eq!(challenge.phase(), Phase::Memorize);
    }

    #[test]
    fn cancel_closes_any_live_phase() {
        let mut challenge = Challenge::start("ox");
        assert_eq!(challenge.cancel(), Transition::Finished(Outcome::Cancelled));
        assert!(challenge.is_closed());
        assert_eq!(challenge.cancel(), Transition::Stay);
        assert_eq!(challenge.submit("ox"), Transition::Stay);
    }
}
