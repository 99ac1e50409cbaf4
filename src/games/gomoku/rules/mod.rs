//! Game rules for five-in-a-row.
//!
//! Pure functions over move history, kept apart from the engine so they
//! can be rerun after any wholesale state replacement.

pub mod win;

pub use win::{Victory, detect_win};
