pub mod book;
pub mod card;
pub mod challenge;
pub mod deck;
pub mod desk;
pub mod flip;
pub mod gesture;
pub mod layout;
pub mod ledger;
pub mod modal;
pub mod prefs;
#[cfg(feature = "server")]
pub mod server;
pub mod source;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod word;

pub use book::{Book, BookError};
pub use card::{CardColor, CardKey, CardMotion, CardVisual, DeskView, Rotation};
pub use challenge::{
    CHALLENGE_REWARD, Challenge, Countdown, MEMORIZE_SECONDS, Outcome, Phase, SPELL_SECONDS,
    Transition,
};
pub use deck::Deck;
pub use desk::{DeskController, DeskEvent, Removal};
pub use flip::{FlipMove, Rect, RepackError, RepackPlan, plan_flip};
pub use gesture::{Cooldown, TapCounter, TapOutcome};
pub use layout::{CardPosition, card_position, column_count, layout_positions};
pub use ledger::CoinLedger;
pub use modal::{Inspector, ModalEffect, ModalSession};
pub use prefs::{KeyValueStore, MemoryStore, Preferences, PrefsError};
pub use source::{WordLibrary, WordSourceError};
pub use word::WordRecord;
