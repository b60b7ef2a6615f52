//! Grid placement for cards on the desk.
//!
//! Positions depend only on a card's index and the container width, so a
//! layout pass can run any number of times without drifting.

pub const CARD_WIDTH: f64 = 140.0;
pub const CARD_HEIGHT: f64 = 160.0;
pub const GAP_X: f64 = 30.0;
pub const GAP_Y: f64 = 30.0;
pub const DESK_PADDING: f64 = 40.0;

/// Top-left corner of a card, in pixels relative to the desk.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CardPosition {
    pub left: f64,
    pub top: f64,
}

impl CardPosition {
    pub fn right(&self) -> f64 {
        self.left + CARD_WIDTH
    }

    pub fn bottom(&self) -> f64 {
        self.top + CARD_HEIGHT
    }

    pub fn overlaps(&self, other: &CardPosition) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// Number of card columns that fit in `width`. Never less than one.
pub fn column_count(width: f64) -> usize {
    let columns = ((width - DESK_PADDING * 2.0 + GAP_X) / (CARD_WIDTH + GAP_X)).floor();
    if columns.is_finite() && columns >= 1.0 {
        columns as usize
    } else {
        1
    }
}

pub fn card_position(index: usize, width: f64) -> CardPosition {
    position_in_grid(index, column_count(width))
}

fn position_in_grid(index: usize, columns: usize) -> CardPosition {
    let row = index / columns;
    let col = index % columns;

    CardPosition {
        left: DESK_PADDING + col as f64 * (CARD_WIDTH + GAP_X),
        top: DESK_PADDING + row as f64 * (CARD_HEIGHT + GAP_Y),
    }
}

pub fn layout_positions(count: usize, width: f64) -> Vec<CardPosition> {
    let columns = column_count(width);
    (0..count)
        .map(|index| position_in_grid(index, columns))
        .collect()
}

/// Minimum desk height that keeps every row plus bottom padding visible.
pub fn desk_height(count: usize, width: f64) -> f64 {
    if count == 0 {
        return DESK_PADDING * 2.0;
    }

    let rows = count.div_ceil(column_count(width));
    DESK_PADDING * 2.0 + rows as f64 * CARD_HEIGHT + (rows - 1) as f64 * GAP_Y
}
