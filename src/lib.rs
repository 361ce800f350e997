//! ghisa - personal hypertrophy training log
//!
//! "ghisa" (cast iron) is Italian gym slang for the plates. A weekly
//! split with a fixed catalog, per-exercise session logging in two
//! granularities, custom day ordering, weekly volume stats and an AI
//! coach, all in the terminal.

pub mod ai;
pub mod catalog;
pub mod entry;
pub mod ordering;
pub mod state;
pub mod store;
pub mod tui;
pub mod volume;

pub use state::AppState;
pub use store::Store;
