//! Six-faced dice and validated die sets.

use crate::error::DiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Faces on every die
pub const FACES_PER_DIE: usize = 6;

/// Smallest die set a match can be played with
pub const MIN_DICE: usize = 3;

/// An ordered sequence of six integer faces. Repeats are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die([i64; FACES_PER_DIE]);

impl Die {
    pub fn new(faces: [i64; FACES_PER_DIE]) -> Self {
        Self(faces)
    }

    /// Parse a comma-separated face list; `number` is the 1-based position used in errors
    pub fn parse(number: usize, s: &str) -> Result<Self, DiceError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != FACES_PER_DIE {
            return Err(DiceError::WrongFaceCount {
                die: number,
                found: parts.len(),
            });
        }

        let mut faces = [0i64; FACES_PER_DIE];
        for (slot, part) in faces.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| DiceError::InvalidFace {
                die: number,
                face: part.to_string(),
            })?;
        }
        Ok(Self(faces))
    }

    pub fn faces(&self) -> &[i64; FACES_PER_DIE] {
        &self.0
    }

    /// Face shown for a roll index in `[0, 6)`
    pub fn face(&self, roll: u32) -> Option<i64> {
        self.0.get(roll as usize).copied()
    }
}

impl FromStr for Die {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(1, s)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.0.iter().map(i64::to_string).collect();
        write!(f, "{}", faces.join(","))
    }
}

/// At least three validated dice. Construction is the only validation point,
/// so a `DieSet` handed to the engine is always playable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Die>")]
pub struct DieSet(Vec<Die>);

impl TryFrom<Vec<Die>> for DieSet {
    type Error = DiceError;

    fn try_from(dice: Vec<Die>) -> Result<Self, Self::Error> {
        Self::new(dice)
    }
}

impl DieSet {
    pub fn new(dice: Vec<Die>) -> Result<Self, DiceError> {
        if dice.len() < MIN_DICE {
            return Err(DiceError::TooFewDice {
                found: dice.len(),
                required: MIN_DICE,
            });
        }
        Ok(Self(dice))
    }

    /// Parse one die per argument, e.g. `["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]`
    pub fn parse<I, S>(args: I) -> Result<Self, DiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        if args.len() < MIN_DICE {
            return Err(DiceError::TooFewDice {
                found: args.len(),
                required: MIN_DICE,
            });
        }

        let dice = args
            .iter()
            .enumerate()
            .map(|(i, arg)| Die::parse(i + 1, arg.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dice)
    }

    /// Bypass validation to exercise the engine's own guards
    #[cfg(test)]
    pub(crate) fn unchecked(dice: Vec<Die>) -> Self {
        Self(dice)
    }

    /// The classic non-transitive trio shown on the help screen
    pub fn default_set() -> Self {
        Self(vec![
            Die::new([2, 2, 4, 4, 9, 9]),
            Die::new([6, 8, 1, 1, 8, 6]),
            Die::new([7, 5, 3, 7, 5, 3]),
        ])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Die] {
        &self.0
    }
}
