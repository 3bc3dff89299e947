//! Outcome type with its value domain enforced.
//!
//! An outcome maps onto exactly one of {-1, 0, +1}; any other integer is
//! rejected at conversion time.

use std::fmt;

use crate::{PlannerError, Result};

/// Result of evaluating a world state.
///
/// # Example
/// ```
/// use tilebot_core::Outcome;
///
/// assert_eq!(Outcome::Win.value(), 1);
/// assert!(Outcome::Loss.is_terminal());
/// assert!(!Outcome::Ongoing.is_terminal());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    /// The agent died: hazard contact or fell off the playable border.
    Loss,
    /// Nothing decided yet.
    #[default]
    Ongoing,
    /// The agent reached a goal.
    Win,
}

impl Outcome {
    /// All outcomes in ascending value order.
    pub const ALL: [Outcome; 3] = [Outcome::Loss, Outcome::Ongoing, Outcome::Win];

    /// Integer value: -1 for a loss, 0 while ongoing, +1 for a win.
    pub const fn value(self) -> i8 {
        match self {
            Outcome::Loss => -1,
            Outcome::Ongoing => 0,
            Outcome::Win => 1,
        }
    }

    /// Convert an integer result back into an outcome.
    ///
    /// # Errors
    /// Returns `PlannerError::InvalidOutcome` for anything outside {-1, 0, 1}.
    pub fn from_value(value: i8) -> Result<Self> {
        match value {
            -1 => Ok(Outcome::Loss),
            0 => Ok(Outcome::Ongoing),
            1 => Ok(Outcome::Win),
            other => Err(PlannerError::InvalidOutcome(other)),
        }
    }

    /// True for a win or a loss.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Loss => write!(f, "loss"),
            Outcome::Ongoing => write!(f, "ongoing"),
            Outcome::Win => write!(f, "win"),
        }
    }
}

impl From<Outcome> for i8 {
    fn from(outcome: Outcome) -> i8 {
        outcome.value()
    }
}

impl TryFrom<i8> for Outcome {
    type Error = PlannerError;

    fn try_from(value: i8) -> Result<Self> {
        Outcome::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_values() {
        assert_eq!(Outcome::Loss.value(), -1);
        assert_eq!(Outcome::Ongoing.value(), 0);
        assert_eq!(Outcome::Win.value(), 1);
    }

    #[test]
    fn test_outcome_from_value() {
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::from_value(outcome.value()).unwrap(), outcome);
        }
        assert_eq!(
            Outcome::from_value(2),
            Err(PlannerError::InvalidOutcome(2))
        );
        assert!(Outcome::try_from(-3).is_err());
    }

    #[test]
    fn test_outcome_terminal() {
        assert!(Outcome::Win.is_terminal());
        assert!(Outcome::Loss.is_terminal());
        assert!(!Outcome::Ongoing.is_terminal());
    }

    #[test]
    fn test_outcome_default_is_ongoing() {
        assert_eq!(Outcome::default(), Outcome::Ongoing);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Win.to_string(), "win");
        assert_eq!(Outcome::Loss.to_string(), "loss");
    }
}
