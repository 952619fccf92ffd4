//! Controllers that write movement intents onto a player
//!
//! Controllers never advance the world themselves; they only read it (or
//! clones of it) and set one player's `Movement` flags.

pub mod chase;
pub mod minimax;

pub use chase::ChaseAI;
pub use minimax::{MinimaxAI, SearchOutcome};
