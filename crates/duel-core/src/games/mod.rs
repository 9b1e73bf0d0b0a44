//! Moves and resolution rules.

mod moves;
mod resolution;

pub use moves::Move;
pub use resolution::{resolve, TiePolicy};
