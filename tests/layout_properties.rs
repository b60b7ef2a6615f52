use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wordcards::layout::{CARD_WIDTH, DESK_PADDING, desk_height};
use wordcards::{
    CardMotion, Deck, DeskView, Rotation, WordRecord, card_position, column_count,
    layout_positions,
};

fn deck_of(count: usize) -> Deck {
    Deck::from_records(
        (0..count)
            .map(|index| WordRecord::new(format!("word{index}")))
            .collect(),
    )
}

proptest! {
    #[test]
    fn there_is_always_at_least_one_column(width in -1000.0f64..5000.0) {
        prop_assert!(column_count(width) >= 1);
    }

    #[test]
    fn cards_never_overlap(count in 0usize..40, width in 0.0f64..2000.0) {
        let positions = layout_positions(count, width);

        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn every_column_fits_when_width_allows(count in 1usize..40, width in 220.0f64..2000.0) {
        for position in layout_positions(count, width) {
            prop_assert!(position.right() <= width - DESK_PADDING + 1e-9);
        }
    }

    #[test]
    fn layout_is_a_pure_function_of_index(count in 0usize..30, width in 0.0f64..2000.0) {
        let positions = layout_positions(count, width);

        prop_assert_eq!(&positions, &layout_positions(count, width));
        for (index, position) in positions.iter().enumerate() {
            prop_assert_eq!(*position, card_position(index, width));
        }
    }

    #[test]
    fn desk_height_covers_the_last_row(count in 1usize..40, width in 0.0f64..2000.0) {
        let height = desk_height(count, width);
        let lowest = layout_positions(count, width)
            .iter()
            .map(|position| position.bottom())
            .fold(0.0, f64::max);

        prop_assert!((height - (lowest + DESK_PADDING)).abs() < 1e-9);
    }

    #[test]
    fn rotation_stays_in_range(degrees in -100.0f64..100.0) {
        let rotation = Rotation::new(degrees).degrees();

        prop_assert!((-Rotation::LIMIT..=Rotation::LIMIT).contains(&rotation));
        prop_assert!(((rotation * 10.0).round() - rotation * 10.0).abs() < 1e-6);
    }

    #[test]
    fn repack_leaves_survivors_in_the_new_layout(
        count in 1usize..20,
        pick in 0usize..20,
        width in 200.0f64..1200.0,
        seed in any::<u64>(),
    ) {
        let deck = deck_of(count);
        let mut view = DeskView::render(&deck, width, &mut StdRng::seed_from_u64(seed));
        let key = view.key_for(&format!("word{}", pick % count)).expect("word is drawn");

        let plan = view.remove_and_repack(&key).expect("key resolves");
        prop_assert_eq!(plan.moves.len(), count - 1);
        prop_assert!(view.resolve(&key).is_none());

        let expected = layout_positions(count - 1, width);
        for (card, position) in view.cards().iter().zip(&expected) {
            prop_assert_eq!(card.position, *position);
            prop_assert_eq!(card.motion, CardMotion::Resting);
        }

        view.invert(&plan);
        view.play();
        view.settle();
        prop_assert!(view.cards().iter().all(|card| card.motion == CardMotion::Resting));
    }
}

#[test]
fn narrow_desk_stacks_cards_in_one_column() {
    let positions = layout_positions(3, CARD_WIDTH);

    assert!(positions.iter().all(|position| position.left == DESK_PADDING));
    assert_eq!(positions[2].top, DESK_PADDING + 2.0 * (160.0 + 30.0));
}
