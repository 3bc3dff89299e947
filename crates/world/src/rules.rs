//! Global movement rules for the world model.

/// Probability of applying the goal-direction bias in one action query.
pub const DEFAULT_DIRECTION_BIAS_PROBABILITY: f64 = 0.3;

/// Switches that shape the legal-action set.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Restrict the action set to `LEFT` / `RIGHT`.
    pub jumping_disabled: bool,

    /// Stochastically drop actions heading away from the best goal.
    pub weighted_direction_bias: bool,

    /// Chance that the direction bias fires when enabled.
    pub direction_bias_probability: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            jumping_disabled: false,
            weighted_direction_bias: false,
            direction_bias_probability: DEFAULT_DIRECTION_BIAS_PROBABILITY,
        }
    }
}

impl Rules {
    /// Builder pattern: disable jumping.
    pub fn without_jumping(mut self) -> Self {
        self.jumping_disabled = true;
        self
    }

    /// Builder pattern: enable the direction bias with the given probability.
    pub fn with_direction_bias(mut self, probability: f64) -> Self {
        self.weighted_direction_bias = true;
        self.direction_bias_probability = probability;
        self
    }
}
