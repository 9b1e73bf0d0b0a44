//! Rock-Paper-Scissors moves.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three game pieces.
///
/// Symbol indices are fixed: `A = Rock = 0`, `B = Paper = 1`,
/// `C = Scissors = 2`. A beats C, B beats A, C beats B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    #[serde(alias = "A")]
    Rock,
    #[serde(alias = "B")]
    Paper,
    #[serde(alias = "C")]
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Position in the cyclic order
    pub fn index(&self) -> u8 {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }

    /// Single-letter symbol
    pub fn symbol(&self) -> char {
        match self {
            Move::Rock => 'A',
            Move::Paper => 'B',
            Move::Scissors => 'C',
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        (3 + self.index() - other.index()) % 3 == 1
    }
}

impl TryFrom<u8> for Move {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Rock),
            1 => Ok(Move::Paper),
            2 => Ok(Move::Scissors),
            other => Err(EngineError::InvalidMove(other.to_string())),
        }
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "rock" | "0" => Ok(Move::Rock),
            "b" | "paper" | "1" => Ok(Move::Paper),
            "c" | "scissors" | "2" => Ok(Move::Scissors),
            _ => Err(EngineError::InvalidMove(s.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "Rock"),
            Move::Paper => write!(f, "Paper"),
            Move::Scissors => write!(f, "Scissors"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dominance() {
        // A beats C, B beats A, C beats B
        assert!(Move::Rock.beats(&Move::Scissors));
        assert!(Move::Paper.beats(&Move::Rock));
        assert!(Move::Scissors.beats(&Move::Paper));

        assert!(!Move::Scissors.beats(&Move::Rock));
        assert!(!Move::Rock.beats(&Move::Paper));
        assert!(!Move::Paper.beats(&Move::Scissors));
    }

    #[test]
    fn test_nothing_beats_itself() {
        for m in Move::ALL {
            assert!(!m.beats(&m));
        }
    }

    #[test]
    fn test_try_from_u8() {
        assert_eq!(Move::try_from(0).unwrap(), Move::Rock);
        assert_eq!(Move::try_from(1).unwrap(), Move::Paper);
        assert_eq!(Move::try_from(2).unwrap(), Move::Scissors);
        assert!(matches!(Move::try_from(3), Err(EngineError::InvalidMove(_))));
        assert!(matches!(Move::try_from(255), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn test_from_str_accepts_symbols_and_names() {
        assert_eq!("A".parse::<Move>().unwrap(), Move::Rock);
        assert_eq!("paper".parse::<Move>().unwrap(), Move::Paper);
        assert_eq!(" Scissors ".parse::<Move>().unwrap(), Move::Scissors);
        assert!(matches!("lizard".parse::<Move>(), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn test_serde_names_and_aliases() {
        assert_eq!(serde_json::to_string(&Move::Rock).unwrap(), "\"rock\"");
        let m: Move = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(m, Move::Scissors);
        assert!(serde_json::from_str::<Move>("\"D\"").is_err());
    }
}
