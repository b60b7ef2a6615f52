//! First-Last-Invert-Play repacking after a card leaves the desk.
//!
//! Removing a card shifts every later card one slot back. Rather than letting
//! each card jump, the desk measures where the survivors were, lays them out
//! again, draws each one offset back to its old spot with transitions off,
//! then releases the offset with a timed transition so they slide into the
//! gap. Tilt is carried through every step untouched.

use crate::card::{CardKey, CardMotion, CardVisual, DeskView};
use crate::layout::CardPosition;

pub const REPACK_DURATION_MS: u32 = 500;
pub const REPACK_TRANSITION: &str = "transform 0.5s ease";
/// Length of the removal cue played on a card before the repack starts.
pub const EXPLODE_DURATION_MS: u32 = 500;

/// On-screen location of a card at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
}

impl From<CardPosition> for Rect {
    fn from(position: CardPosition) -> Self {
        Self {
            left: position.left,
            top: position.top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlipMove {
    Stay,
    Slide { dx: f64, dy: f64 },
}

/// Pairs old and new rects index by index. Extra entries on either side are
/// ignored.
pub fn plan_flip(old: &[Rect], new: &[Rect]) -> Vec<FlipMove> {
    old.iter()
        .zip(new)
        .map(|(before, after)| {
            let dx = before.left - after.left;
            let dy = before.top - after.top;
            if dx == 0.0 && dy == 0.0 {
                FlipMove::Stay
            } else {
                FlipMove::Slide { dx, dy }
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardMove {
    pub key: CardKey,
    pub flip: FlipMove,
}

/// Result of taking one card off the desk.
#[derive(Debug, Clone, PartialEq)]
pub struct RepackPlan {
    pub removed: CardVisual,
    /// One entry per surviving card, in desk order.
    pub moves: Vec<CardMove>,
}

impl RepackPlan {
    pub fn sliding_count(&self) -> usize {
        self.moves
            .iter()
            .filter(|card| matches!(card.flip, FlipMove::Slide { .. }))
            .count()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RepackError {
    #[error("card for {0:?} is no longer on the desk")]
    StaleCard(String),
}

impl CardVisual {
    fn screen_rect(&self) -> Rect {
        match self.motion {
            CardMotion::Inverted { dx, dy } => Rect {
                left: self.position.left + dx,
                top: self.position.top + dy,
            },
            _ => self.position.into(),
        }
    }
}

impl DeskView {
    pub fn rects(&self) -> Vec<Rect> {
        self.cards.iter().map(CardVisual::screen_rect).collect()
    }

    /// Detaches a card and lays the survivors out again, returning how far
    /// each survivor moved. The desk is left at its final layout with every
    /// survivor still drawn at rest; call [`DeskView::invert`] to start the
    /// slide.
    pub fn remove_and_repack(&mut self, key: &CardKey) -> Result<RepackPlan, RepackError> {
        let index = self
            .resolve(key)
            .ok_or_else(|| RepackError::StaleCard(key.word().to_string()))?;

        let mut old = self.rects();
        old.remove(index);

        let removed = self.cards.remove(index);
        self.relayout(self.width());

        let new = self.rects();
        let moves = self
            .cards
            .iter()
            .zip(plan_flip(&old, &new))
            .map(|(card, flip)| CardMove {
                key: card.key(),
                flip,
            })
            .collect();

        Ok(RepackPlan { removed, moves })
    }

    /// Offsets every sliding survivor back to its old rect. A card playing
    /// its explosion cue keeps playing it.
    pub fn invert(&mut self, plan: &RepackPlan) {
        for card_move in &plan.moves {
            let Some(index) = self.resolve(&card_move.key) else {
                continue;
            };
            let card = &mut self.cards[index];
            if card.motion == CardMotion::Exploding {
                continue;
            }
            card.motion = match card_move.flip {
                FlipMove::Stay => CardMotion::Resting,
                FlipMove::Slide { dx, dy } => CardMotion::Inverted { dx, dy },
            };
        }
    }

    /// Releases inverted offsets so the cards transition to their slots.
    pub fn play(&mut self) {
        for card in &mut self.cards {
            if let CardMotion::Inverted { .. } = card.motion {
                card.motion = CardMotion::Sliding;
            }
        }
    }

    /// Clears transition overrides once the slide has finished.
    pub fn settle(&mut self) {
        for card in &mut self.cards {
            if matches!(card.motion, CardMotion::Inverted { .. } | CardMotion::Sliding) {
                card.motion = CardMotion::Resting;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::word::WordRecord;
    use rand::SeedableRng;

    // Two columns at this width.
    const WIDTH: f64 = 390.0;

    fn view(words: &[&str]) -> DeskView {
        let deck = Deck::from_records(words.iter().map(|w| WordRecord::new(*w)).collect());
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        DeskView::render(&deck, WIDTH, &mut rng)
    }

    #[test]
    fn zero_delta_means_stay() {
        let rect = Rect { left: 40.0, top: 40.0 };
        let moved = Rect { left: 210.0, top: 40.0 };

        let moves = plan_flip(&[rect, moved], &[rect, rect]);

        assert_eq!(moves[0], FlipMove::Stay);
        assert_eq!(moves[1], FlipMove::Slide { dx: 170.0, dy: 0.0 });
    }

    #[test]
    fn removing_first_card_slides_all_survivors() {
        let mut desk = view(&["a", "b", "c", "d"]);
        let key = desk.key_for("a").expect("a is drawn");

        let plan = desk.remove_and_repack(&key).expect("card is live");

        assert_eq!(plan.removed.word, "a");
        assert_eq!(plan.moves.len(), 3);
        assert_eq!(plan.sliding_count(), 3);
        // "c" wraps from row two back up to the first row.
        assert_eq!(plan.moves[1].flip, FlipMove::Slide { dx: -170.0, dy: 190.0 });
        assert_eq!(desk.words(), vec!["b", "c", "d"]);
    }

    #[test]
    fn cards_before_the_gap_stay_put() {
        let mut desk = view(&["a", "b", "c", "d"]);
        let key = desk.key_for("c").expect("c is drawn");

        let plan = desk.remove_and_repack(&key).expect("card is live");

        assert_eq!(plan.moves.len(), 3);
        assert_eq!(plan.moves[0].flip, FlipMove::Stay);
        assert_eq!(plan.moves[1].flip, FlipMove::Stay);
        assert_eq!(plan.sliding_count(), 1);

        desk.invert(&plan);
        assert_eq!(desk.cards()[0].motion, CardMotion::Resting);
        assert_eq!(desk.cards()[0].transition_css(), None);
    }

    #[test]
    fn rotation_survives_every_step() {
        let mut desk = view(&["a", "b", "c", "d", "e"]);
        let tilt_of = |desk: &DeskView, word: &str| {
            desk.card(&desk.key_for(word).expect("drawn"))
                .map(|card| card.rotation)
        };
        let before = tilt_of(&desk, "e");

        let key = desk.key_for("b").expect("b is drawn");
        let plan = desk.remove_and_repack(&key).expect("card is live");
        desk.invert(&plan);
        let inverted = desk.card(&desk.key_for("e").expect("drawn")).cloned().expect("drawn");
        assert!(inverted.transform_css().ends_with(&inverted.rotation.to_string()));
        assert!(inverted.transform_css().starts_with("translate("));
        assert_eq!(tilt_of(&desk, "e"), before);

        desk.play();
        assert_eq!(tilt_of(&desk, "e"), before);
        desk.settle();
        assert_eq!(tilt_of(&desk, "e"), before);
        assert!(desk.cards().iter().all(|card| card.motion == CardMotion::Resting));
    }

    #[test]
    fn inverted_cards_sit_on_their_old_rect() {
        let mut desk = view(&["a", "b", "c"]);
        let old = desk.rects();

        let key = desk.key_for("a").expect("a is drawn");
        let plan = desk.remove_and_repack(&key).expect("card is live");
        desk.invert(&plan);

        assert_eq!(desk.rects(), old[1..].to_vec());
        desk.play();
        assert_eq!(desk.cards()[0].transition_css(), Some(REPACK_TRANSITION));
    }

    #[test]
    fn stale_key_is_reported() {
        let mut desk = view(&["a"]);
        let key = desk.key_for("a").expect("a is drawn");
        desk.remove_and_repack(&key).expect("first removal works");

        assert_eq!(
            desk.remove_and_repack(&key),
            Err(RepackError::StaleCard("a".to_string()))
        );
    }

    #[test]
    fn exploding_card_ignores_the_repack() {
        let mut desk = view(&["a", "b", "c"]);
        let exploding = desk.key_for("c").expect("c is drawn");
        assert!(desk.mark_exploding(&exploding));

        let key = desk.key_for("a").expect("a is drawn");
        let plan = desk.remove_and_repack(&key).expect("card is live");
        assert_eq!(plan.sliding_count(), 2);

        desk.invert(&plan);
        desk.play();
        desk.settle();

        let motion = desk.card(&exploding).map(|card| card.motion);
        assert_eq!(motion, Some(CardMotion::Exploding));
    }
}
