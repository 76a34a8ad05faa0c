use serde::{Deserialize, Serialize};

/// Scoring weights for the grading pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Points awarded for a correct multiple-choice answer.
    pub multiple_choice_weight: u32,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            multiple_choice_weight: 1,
        }
    }
}
