//! Domain types for WeekMode

pub mod bar;
pub mod mode;

pub use bar::PriceBar;
pub use mode::{Mode, ModeRecord, ModeSignal};
