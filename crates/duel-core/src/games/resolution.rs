//! Resolution of a pair of moves into an outcome.

use super::Move;
use crate::protocol::Outcome;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What happens when both parties play the same move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    /// Equal moves go to the first mover
    #[default]
    FirstMoverWins,
    /// Equal moves return each party's own stake as credit
    Draw,
}

impl FromStr for TiePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-mover" | "first-mover-wins" => Ok(TiePolicy::FirstMoverWins),
            "draw" => Ok(TiePolicy::Draw),
            other => Err(format!("unknown tie policy: {}", other)),
        }
    }
}

/// Resolve `first` against `second`.
///
/// `(second - first) mod 3 == 1` means the second mover wins; every other
/// pair goes to the first mover, except equal moves under `TiePolicy::Draw`.
pub fn resolve(first: Move, second: Move, tie_policy: TiePolicy) -> Outcome {
    if first == second && tie_policy == TiePolicy::Draw {
        Outcome::Draw
    } else if second.beats(&first) {
        Outcome::SecondWins
    } else {
        Outcome::FirstWins
    }
}
