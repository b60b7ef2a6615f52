//! The inspection card opened by clicking a card on the desk.
//!
//! [`Inspector`] owns the one live [`ModalSession`]. Every entry point returns
//! a [`ModalEffect`] describing what the desk has to do next; the inspector
//! itself never touches the deck.

use crate::card::{CardColor, CardKey};
use crate::challenge::{CHALLENGE_REWARD, Challenge, Countdown, Outcome, Transition};
use crate::gesture::{Cooldown, TapCounter, TapOutcome};
use crate::word::WordRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    word: WordRecord,
    color: CardColor,
    card: CardKey,
    definition_visible: bool,
    taps: TapCounter,
    challenge: Option<Challenge>,
    speak: Cooldown,
}

impl ModalSession {
    fn new(word: WordRecord, color: CardColor, card: CardKey) -> Self {
        Self {
            word,
            color,
            card,
            definition_visible: false,
            taps: TapCounter::default(),
            challenge: None,
            speak: Cooldown::default(),
        }
    }

    pub fn word(&self) -> &WordRecord {
        &self.word
    }

    pub fn color(&self) -> CardColor {
        self.color
    }

    pub fn card(&self) -> &CardKey {
        &self.card
    }

    pub fn definition_visible(&self) -> bool {
        self.definition_visible
    }

    /// Headword and phonetic are hidden while a challenge tests recall.
    pub fn word_visible(&self) -> bool {
        !self.challenge_active()
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn challenge_active(&self) -> bool {
        self.challenge
            .as_ref()
            .is_some_and(|challenge| !challenge.is_closed())
    }

    pub fn tap_count(&self) -> u32 {
        self.taps.count()
    }

    fn teardown(&mut self) {
        if let Some(challenge) = self.challenge.as_mut() {
            challenge.cancel();
        }
        self.taps.reset();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalEffect {
    /// Nothing changed.
    None,
    /// Visible session state changed; redraw it.
    Refresh,
    /// A challenge began; start the memorize countdown.
    ChallengeStarted,
    /// Memorize is over; replace the countdown and clear the answer field.
    ChallengeSpell,
    /// The session ended without touching the deck.
    Closed,
    /// The bound word was triple-tapped away.
    Delete { word: String, card: CardKey },
    /// The bound word was spelled correctly.
    ChallengeWon {
        word: String,
        card: CardKey,
        reward: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inspector {
    session: Option<ModalSession>,
}

impl Inspector {
    /// Binds the inspection card to `word`, tearing down any live session
    /// first.
    pub fn open(&mut self, word: WordRecord, color: CardColor, card: CardKey) -> &ModalSession {
        self.close();
        self.session.insert(ModalSession::new(word, color, card))
    }

    /// Ends the live session, cancelling any challenge it was running.
    pub fn close(&mut self) -> Option<ModalSession> {
        let mut session = self.session.take()?;
        session.teardown();
        Some(session)
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn challenge_active(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(ModalSession::challenge_active)
    }

    /// The countdown the adapter should have running, if any.
    pub fn countdown(&self) -> Option<Countdown> {
        self.session
            .as_ref()
            .and_then(|session| session.challenge.as_ref())
            .and_then(Challenge::countdown)
    }

    pub fn toggle_definition(&mut self) -> ModalEffect {
        match self.session.as_mut() {
            Some(session) => {
                session.definition_visible = !session.definition_visible;
                ModalEffect::Refresh
            }
            None => ModalEffect::None,
        }
    }

    /// A click on the inspection card itself. Three in quick succession
    /// delete the bound word. Ignored while a challenge is running.
    pub fn tap(&mut self, now_ms: f64) -> ModalEffect {
        let Some(session) = self.session.as_mut() else {
            return ModalEffect::None;
        };
        if session.challenge_active() {
            return ModalEffect::None;
        }

        match session.taps.register(now_ms) {
            TapOutcome::Counting(_) => ModalEffect::None,
            TapOutcome::Triggered => match self.close() {
                Some(session) => ModalEffect::Delete {
                    word: session.word.word,
                    card: session.card,
                },
                None => ModalEffect::None,
            },
        }
    }

    pub fn start_challenge(&mut self) -> ModalEffect {
        let Some(session) = self.session.as_mut() else {
            return ModalEffect::None;
        };

        session.teardown();
        session.challenge = Some(Challenge::start(session.word.word.clone()));
        ModalEffect::ChallengeStarted
    }

    pub fn tick(&mut self) -> ModalEffect {
        self.drive(Challenge::tick)
    }

    pub fn start_spelling(&mut self) -> ModalEffect {
        self.drive(Challenge::start_spelling)
    }

    pub fn submit(&mut self, input: &str) -> ModalEffect {
        self.drive(|challenge| challenge.submit(input))
    }

    /// The Enter key while the inspection card is open.
    pub fn enter(&mut self, input: &str) -> ModalEffect {
        self.drive(|challenge| challenge.enter(input))
    }

    /// The exit button of the challenge panel closes the whole card.
    pub fn exit_challenge(&mut self) -> ModalEffect {
        match self.close() {
            Some(_) => ModalEffect::Closed,
            None => ModalEffect::None,
        }
    }

    /// A click on the dimmed mask around the card. Ignored mid-challenge.
    pub fn dismiss_mask(&mut self) -> ModalEffect {
        if self.challenge_active() {
            return ModalEffect::None;
        }
        self.exit_challenge()
    }

    /// Returns the word to pronounce, unless the cooldown is still running.
    pub fn speak(&mut self, now_ms: f64) -> Option<String> {
        let session = self.session.as_mut()?;
        session
            .speak
            .try_fire(now_ms)
            .then(|| session.word.word.clone())
    }

    fn drive(&mut self, step: impl FnOnce(&mut Challenge) -> Transition) -> ModalEffect {
        let Some(challenge) = self
            .session
            .as_mut()
            .and_then(|session| session.challenge.as_mut())
            .filter(|challenge| !challenge.is_closed())
        else {
            return ModalEffect::None;
        };

        match step(challenge) {
            Transition::Stay | Transition::Rejected => ModalEffect::Refresh,
            Transition::EnterSpell => ModalEffect::ChallengeSpell,
            Transition::Finished(Outcome::Success) => match self.close() {
                Some(session) => ModalEffect::ChallengeWon {
                    word: session.word.word,
                    card: session.card,
                    reward: CHALLENGE_REWARD,
                },
                None => ModalEffect::None,
            },
            Transition::Finished(Outcome::Timeout | Outcome::Cancelled) => {
                self.close();
                ModalEffect::Closed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::DeskView;
    use crate::challenge::{MEMORIZE_SECONDS, Phase, SPELL_SECONDS};
    use crate::deck::Deck;
    use rand::SeedableRng;

    fn open_on(word: &str) -> Inspector {
        let deck = Deck::from_records(vec![WordRecord::new(word).with_phonetic("/x/")]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        let view = DeskView::render(&deck, 600.0, &mut rng);
        let key = view.key_for(word).expect("word is drawn");

        let mut inspector = Inspector::default();
        inspector.open(
            deck.get(word).cloned().expect("word is in deck"),
            CardColor::Mint,
            key,
        );
        inspector
    }

    #[test]
    fn open_starts_with_definition_hidden() {
        let inspector = open_on("apple");
        let session = inspector.session().expect("session is live");

        assert!(!session.definition_visible());
        assert!(session.word_visible());
        assert_eq!(session.challenge(), None);
    }

    #[test]
    fn toggle_definition_flips_visibility() {
        let mut inspector = open_on("apple");

        inspector.toggle_definition();
        assert!(inspector.session().expect("live").definition_visible());
        inspector.toggle_definition();
        assert!(!inspector.session().expect("live").definition_visible());
    }

    #[test]
    fn reopening_tears_down_previous_challenge() {
        let mut inspector = open_on("apple");
        inspector.start_challenge();
        assert_eq!(inspector.countdown(), Some(Countdown::Memorize));

        let card = inspector.session().expect("live").card().clone();
        inspector.open(WordRecord::new("book"), CardColor::Rose, card);

        assert!(!inspector.challenge_active());
        assert_eq!(inspector.countdown(), None);
        assert_eq!(inspector.session().map(|s| s.word().word.as_str()), Some("book"));
    }

    #[test]
    fn triple_tap_deletes_bound_word() {
        let mut inspector = open_on("apple");

        assert_eq!(inspector.tap(0.0), ModalEffect::None);
        assert_eq!(inspector.tap(120.0), ModalEffect::None);
        let effect = inspector.tap(240.0);

        assert!(matches!(effect, ModalEffect::Delete { ref word, .. } if word == "apple"));
        assert!(!inspector.is_open());
    }

    #[test]
    fn slow_third_tap_does_not_delete() {
        let mut inspector = open_on("apple");

        inspector.tap(0.0);
        inspector.tap(100.0);
        assert_eq!(inspector.tap(600.0), ModalEffect::None);
        assert!(inspector.is_open());
        assert_eq!(inspector.session().map(ModalSession::tap_count), Some(1));
    }

    #[test]
    fn taps_are_ignored_during_challenge() {
        let mut inspector = open_on("apple");
        inspector.start_challenge();

        for time in [0.0, 50.0, 100.0, 150.0] {
            assert_eq!(inspector.tap(time), ModalEffect::None);
        }
        assert!(inspector.challenge_active());
    }

    #[test]
    fn challenge_hides_word_and_swaps_countdowns() {
        let mut inspector = open_on("apple");
        assert_eq!(inspector.start_challenge(), ModalEffect::ChallengeStarted);
        assert!(!inspector.session().expect("live").word_visible());

        let effects: Vec<_> = (0..MEMORIZE_SECONDS).map(|_| inspector.tick()).collect();
        assert_eq!(effects.last(), Some(&ModalEffect::ChallengeSpell));
        assert_eq!(inspector.countdown(), Some(Countdown::Spell));

        let challenge = inspector
            .session()
            .and_then(ModalSession::challenge)
            .expect("challenge is live");
        assert_eq!(challenge.phase(), Phase::Spell);
        assert_eq!(challenge.spell_seconds_left(), SPELL_SECONDS);
    }

    #[test]
    fn winning_closes_session_with_reward() {
        let mut inspector = open_on("diligent");
        inspector.start_challenge();
        inspector.start_spelling();

        assert_eq!(inspector.submit("dilignet"), ModalEffect::Refresh);
        let effect = inspector.enter(" Diligent ");

        assert!(matches!(
            effect,
            ModalEffect::ChallengeWon {
                ref word,
                reward: CHALLENGE_REWARD,
                ..
            } if word == "diligent"
        ));
        assert!(!inspector.is_open());
        assert_eq!(inspector.countdown(), None);
    }

    #[test]
    fn timeout_closes_silently() {
        let mut inspector = open_on("apple");
        inspector.start_challenge();
        inspector.start_spelling();

        let mut last = ModalEffect::None;
        for _ in 0..SPELL_SECONDS {
            last = inspector.tick();
        }

        assert_eq!(last, ModalEffect::Closed);
        assert!(!inspector.is_open());
    }

    #[test]
    fn mask_is_ignored_mid_challenge() {
        let mut inspector = open_on("apple");
        inspector.start_challenge();

        assert_eq!(inspector.dismiss_mask(), ModalEffect::None);
        assert!(inspector.is_open());
        assert_eq!(inspector.exit_challenge(), ModalEffect::Closed);
        assert!(!inspector.is_open());
    }

    #[test]
    fn speak_respects_cooldown() {
        let mut inspector = open_on("apple");

        assert_eq!(inspector.speak(0.0), Some("apple".to_string()));
        assert_eq!(inspector.speak(1000.0), None);
        assert_eq!(inspector.speak(3000.0), Some("apple".to_string()));
    }
}
