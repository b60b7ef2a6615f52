use std::fmt;

use rand::Rng;

use crate::deck::Deck;
use crate::layout::{self, CardPosition};

/// Warm background tones a card can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardColor {
    Apricot,
    Rose,
    Cream,
    Mint,
    Peach,
    Orchid,
    Salmon,
}

impl CardColor {
    pub const ALL: [CardColor; 7] = [
        CardColor::Apricot,
        CardColor::Rose,
        CardColor::Cream,
        CardColor::Mint,
        CardColor::Peach,
        CardColor::Orchid,
        CardColor::Salmon,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            CardColor::Apricot => "#f9d6b2",
            CardColor::Rose => "#f5b0b0",
            CardColor::Cream => "#f5e3b3",
            CardColor::Mint => "#c7e9b0",
            CardColor::Peach => "#f9c7a2",
            CardColor::Orchid => "#e2b6d4",
            CardColor::Salmon => "#fec8af",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Card tilt in degrees, within [-10, 10] and rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation(f64);

impl Rotation {
    pub const LIMIT: f64 = 10.0;

    pub fn new(degrees: f64) -> Self {
        let clamped = degrees.clamp(-Self::LIMIT, Self::LIMIT);
        Self((clamped * 10.0).round() / 10.0)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(-Self::LIMIT..=Self::LIMIT))
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rotate({:.1}deg)", self.0)
    }
}

/// Animation state of one card on the desk.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CardMotion {
    #[default]
    Resting,
    /// Playing the removal cue; the card no longer accepts clicks.
    Exploding,
    /// Drawn at its new slot but offset back to where it used to be.
    Inverted { dx: f64, dy: f64 },
    /// Transitioning from the inverted offset to its slot.
    Sliding,
}

/// Lookup key for a rendered card. Resolved against the current desk each
/// time it is used, so a card removed by a re-render simply fails to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey(String);

impl CardKey {
    pub fn word(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardVisual {
    pub word: String,
    pub color: CardColor,
    pub rotation: Rotation,
    pub position: CardPosition,
    pub motion: CardMotion,
}

impl CardVisual {
    pub fn key(&self) -> CardKey {
        CardKey(self.word.clone())
    }

    pub fn transform_css(&self) -> String {
        match self.motion {
            CardMotion::Inverted { dx, dy } => {
                format!("translate({dx}px, {dy}px) {}", self.rotation)
            }
            _ => self.rotation.to_string(),
        }
    }

    /// Inline `transition` override, if the current motion needs one.
    pub fn transition_css(&self) -> Option<&'static str> {
        match self.motion {
            CardMotion::Inverted { .. } => Some("none"),
            CardMotion::Sliding => Some(crate::flip::REPACK_TRANSITION),
            CardMotion::Resting | CardMotion::Exploding => None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.motion != CardMotion::Exploding
    }
}

/// The cards currently drawn on the desk, in deck order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeskView {
    pub(crate) cards: Vec<CardVisual>,
    width: f64,
}

impl DeskView {
    /// Draws a fresh card for every word, each with a new color and tilt.
    pub fn render<R: Rng + ?Sized>(deck: &Deck, width: f64, rng: &mut R) -> Self {
        let cards = deck
            .iter()
            .zip(layout::layout_positions(deck.len(), width))
            .map(|(record, position)| CardVisual {
                word: record.word.clone(),
                color: CardColor::random(rng),
                rotation: Rotation::random(rng),
                position,
                motion: CardMotion::Resting,
            })
            .collect();

        Self { cards, width }
    }

    /// Recomputes every card's slot for `width`, keeping colors and tilts.
    pub fn relayout(&mut self, width: f64) {
        self.width = width;
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.position = layout::card_position(index, width);
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        layout::desk_height(self.cards.len(), self.width)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardVisual] {
        &self.cards
    }

    pub fn words(&self) -> Vec<String> {
        self.cards.iter().map(|card| card.word.clone()).collect()
    }

    pub fn key_for(&self, word: &str) -> Option<CardKey> {
        self.cards
            .iter()
            .find(|card| card.word == word)
            .map(CardVisual::key)
    }

    pub fn resolve(&self, key: &CardKey) -> Option<usize> {
        self.cards.iter().position(|card| card.word == key.0)
    }

    pub fn card(&self, key: &CardKey) -> Option<&CardVisual> {
        self.resolve(key).map(|index| &self.cards[index])
    }

    /// Starts the removal cue on a card. Returns false for a stale key.
    pub fn mark_exploding(&mut self, key: &CardKey) -> bool {
        match self.resolve(key) {
            Some(index) => {
                self.cards[index].motion = CardMotion::Exploding;
                true
            }
            None => false,
        }
    }
}
