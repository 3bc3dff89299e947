//! Tiny deterministic game for unit tests.

use rand::Rng;
use tilebot_core::{Game, Outcome, PlannerError, Result};

/// Walk along a line: reaching `+goal` wins, reaching `-goal` loses.
#[derive(Clone, Debug)]
pub struct Corridor {
    pub goal: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Back,
    Forward,
}

impl Game for Corridor {
    type State = i32;
    type Action = Step;
    type Key = i32;

    fn legal_actions<R: Rng + ?Sized>(&self, _state: &i32, _rng: &mut R) -> Vec<Step> {
        vec![Step::Back, Step::Forward]
    }

    fn apply(&self, state: &i32, action: Step) -> Result<i32> {
        Ok(match action {
            Step::Back => state - 1,
            Step::Forward => state + 1,
        })
    }

    fn outcome(&self, state: &i32) -> Outcome {
        if *state >= self.goal {
            Outcome::Win
        } else if *state <= -self.goal {
            Outcome::Loss
        } else {
            Outcome::Ongoing
        }
    }

    fn merge_key(&self, state: &i32) -> i32 {
        *state
    }
}

/// Corridor whose `apply` fails anywhere but the start.
#[derive(Clone, Debug)]
pub struct Broken;

impl Game for Broken {
    type State = i32;
    type Action = Step;
    type Key = i32;

    fn legal_actions<R: Rng + ?Sized>(&self, _state: &i32, _rng: &mut R) -> Vec<Step> {
        vec![Step::Back, Step::Forward]
    }

    fn apply(&self, state: &i32, action: Step) -> Result<i32> {
        if *state != 0 {
            return Err(PlannerError::OutOfBounds {
                row: 0,
                col: *state as isize,
            });
        }
        Corridor { goal: 10 }.apply(state, action)
    }

    fn outcome(&self, _state: &i32) -> Outcome {
        Outcome::Ongoing
    }

    fn merge_key(&self, state: &i32) -> i32 {
        *state
    }
}
