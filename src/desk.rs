//! The single UI session: deck, drawn cards, inspection card and coins.
//!
//! Every change to the deck goes through [`DeskController::remove_word`] or
//! [`DeskController::load`], which update the drawn cards in the same step so
//! the desk never shows a card for a word that is gone. The one exception is
//! a won card playing its explosion cue: its word has already left the deck,
//! and [`DeskController::finish_explosion`] takes the card away afterwards.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::book::Book;
use crate::card::{CardKey, CardMotion, DeskView};
use crate::challenge::Countdown;
use crate::deck::Deck;
use crate::flip::RepackPlan;
use crate::ledger::CoinLedger;
use crate::modal::{Inspector, ModalEffect};

pub const SUCCESS_TOAST: &str = "🎉 挑战成功！ +5金币";
pub const TOAST_DURATION_MS: u32 = 1500;
pub const EMPTY_DESK_MESSAGE: &str = "暂无单词，请选择其他词书";

#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    /// Survivors are drawn inverted; call [`DeskController::play_repack`]
    /// after the styles are flushed, then [`DeskController::settle_repack`].
    Animated(RepackPlan),
    /// The card could not be resolved, so the whole desk was drawn again.
    Rerendered,
}

/// What the rendering adapter has to do after a desk operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DeskEvent {
    Nothing,
    /// Redraw the inspection card; any running countdown keeps going.
    Redraw,
    /// Replace whatever countdown is running with a fresh one.
    CountdownStarted(Countdown),
    /// The inspection card closed; stop every countdown.
    SessionClosed,
    /// A word left the deck; stop every countdown and play the removal.
    Removed(Removal),
    /// A challenge was won. Show the toast; when `exploding` is set, finish
    /// the removal after the cue with [`DeskController::finish_explosion`].
    Won {
        balance: u32,
        exploding: Option<CardKey>,
        removal: Option<Removal>,
    },
}

#[derive(Debug)]
pub struct DeskController {
    book: Book,
    deck: Deck,
    view: DeskView,
    inspector: Inspector,
    ledger: CoinLedger,
    width: f64,
    rng: StdRng,
}

impl DeskController {
    pub fn new(book: Book, ledger: CoinLedger, width: f64, rng: StdRng) -> Self {
        Self {
            book,
            deck: Deck::empty(),
            view: DeskView::default(),
            inspector: Inspector::default(),
            ledger,
            width,
            rng,
        }
    }

    pub fn from_entropy(book: Book, ledger: CoinLedger, width: f64) -> Self {
        Self::new(book, ledger, width, StdRng::from_entropy())
    }

    pub fn book(&self) -> Book {
        self.book
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn view(&self) -> &DeskView {
        &self.view
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn balance(&self) -> u32 {
        self.ledger.balance()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Replaces the deck wholesale, closing any open inspection card.
    pub fn load(&mut self, book: Book, deck: Deck) -> DeskEvent {
        let was_open = self.inspector.close().is_some();

        self.book = book;
        self.deck = deck;
        self.rerender();

        if was_open {
            DeskEvent::SessionClosed
        } else {
            DeskEvent::Nothing
        }
    }

    /// Draws every card again with fresh colors and tilts.
    pub fn refresh(&mut self) {
        self.rerender();
    }

    pub fn resize(&mut self, width: f64) {
        self.width = width;
        self.view.relayout(width);
    }

    pub fn open_card(&mut self, word: &str) -> DeskEvent {
        let Some(key) = self.view.key_for(word) else {
            return DeskEvent::Nothing;
        };
        let Some(card) = self.view.card(&key).filter(|card| card.is_interactive()) else {
            return DeskEvent::Nothing;
        };
        let color = card.color;
        let Some(record) = self.deck.get(word).cloned() else {
            log::warn!("card {word:?} is drawn but missing from the deck");
            self.rerender();
            return DeskEvent::Nothing;
        };

        let had_challenge = self.inspector.countdown().is_some();
        self.inspector.open(record, color, key);

        if had_challenge {
            DeskEvent::SessionClosed
        } else {
            DeskEvent::Redraw
        }
    }

    /// Takes `word` off the deck and the desk together.
    pub fn remove_word(&mut self, word: &str) -> Option<Removal> {
        self.deck.remove(word)?;
        Some(self.repack(word))
    }

    /// Takes the card for `word` off the desk and slides the survivors.
    fn repack(&mut self, word: &str) -> Removal {
        let plan = self
            .view
            .key_for(word)
            .ok_or_else(|| crate::flip::RepackError::StaleCard(word.to_string()))
            .and_then(|key| self.view.remove_and_repack(&key));

        match plan {
            Ok(plan) => {
                self.view.invert(&plan);
                Removal::Animated(plan)
            }
            Err(error) => {
                log::warn!("falling back to a full redraw: {error}");
                self.rerender();
                Removal::Rerendered
            }
        }
    }

    pub fn play_repack(&mut self) {
        self.view.play();
    }

    pub fn settle_repack(&mut self) {
        self.view.settle();
    }

    /// Takes a won card off the desk once its cue has finished playing. The
    /// word itself left the deck when the challenge was won, so a redraw in
    /// the meantime has already dropped the card and this does nothing.
    pub fn finish_explosion(&mut self, key: &CardKey) -> Option<Removal> {
        let exploding = self
            .view
            .card(key)
            .is_some_and(|card| card.motion == CardMotion::Exploding);
        if !exploding {
            return None;
        }

        Some(self.repack(key.word()))
    }

    pub fn toggle_definition(&mut self) -> DeskEvent {
        let effect = self.inspector.toggle_definition();
        self.apply(effect)
    }

    pub fn tap(&mut self, now_ms: f64) -> DeskEvent {
        let effect = self.inspector.tap(now_ms);
        self.apply(effect)
    }

    pub fn start_challenge(&mut self) -> DeskEvent {
        let effect = self.inspector.start_challenge();
        self.apply(effect)
    }

    pub fn tick(&mut self) -> DeskEvent {
        let effect = self.inspector.tick();
        self.apply(effect)
    }

    pub fn start_spelling(&mut self) -> DeskEvent {
        let effect = self.inspector.start_spelling();
        self.apply(effect)
    }

    pub fn submit(&mut self, input: &str) -> DeskEvent {
        let effect = self.inspector.submit(input);
        self.apply(effect)
    }

    pub fn enter(&mut self, input: &str) -> DeskEvent {
        let effect = self.inspector.enter(input);
        self.apply(effect)
    }

    pub fn exit_challenge(&mut self) -> DeskEvent {
        let effect = self.inspector.exit_challenge();
        self.apply(effect)
    }

    pub fn dismiss_mask(&mut self) -> DeskEvent {
        let effect = self.inspector.dismiss_mask();
        self.apply(effect)
    }

    pub fn speak(&mut self, now_ms: f64) -> Option<String> {
        self.inspector.speak(now_ms)
    }

    pub fn apply(&mut self, effect: ModalEffect) -> DeskEvent {
        match effect {
            ModalEffect::None => DeskEvent::Nothing,
            ModalEffect::Refresh => DeskEvent::Redraw,
            ModalEffect::ChallengeStarted => DeskEvent::CountdownStarted(Countdown::Memorize),
            ModalEffect::ChallengeSpell => DeskEvent::CountdownStarted(Countdown::Spell),
            ModalEffect::Closed => DeskEvent::SessionClosed,
            ModalEffect::Delete { word, .. } => match self.remove_word(&word) {
                Some(removal) => DeskEvent::Removed(removal),
                None => DeskEvent::SessionClosed,
            },
            ModalEffect::ChallengeWon { word, card, reward } => {
                let balance = self.ledger.add_coin(reward);

                if self.deck.remove(&word).is_none() {
                    return DeskEvent::Won {
                        balance,
                        exploding: None,
                        removal: None,
                    };
                }

                if self.view.mark_exploding(&card) {
                    DeskEvent::Won {
                        balance,
                        exploding: Some(card),
                        removal: None,
                    }
                } else {
                    DeskEvent::Won {
                        balance,
                        exploding: None,
                        removal: Some(self.repack(&word)),
                    }
                }
            }
        }
    }

    fn rerender(&mut self) {
        self.view = DeskView::render(&self.deck, self.width, &mut self.rng);
    }
}
