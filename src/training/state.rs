use crate::{
    dataset::{XOR, XOR_LEN},
    network::{ForwardResult, NetworkParams},
};

use super::speed::Speed;

/// What the learner sees in the stats panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    /// Completed sweeps over the dataset.
    pub epoch: u64,
    /// Sum of the squared errors of the most recent sweep.
    pub total_loss: f64,
    /// The network's output for each XOR example during the most recent sweep.
    pub predictions: [f64; XOR_LEN],
    /// Set the first time every prediction was right, cleared only by a reset.
    pub converged: bool,
}

impl Default for TrainingState {
    fn default() -> Self {
        Self {
            epoch: 0,
            total_loss: 0.,
            predictions: [0.5; XOR_LEN],
            converged: false,
        }
    }
}

impl TrainingState {
    /// Whether the prediction for the `i`-th XOR example is right.
    pub fn is_correct(&self, i: usize) -> bool {
        XOR[i].is_correct(self.predictions[i])
    }

    /// How many of the four predictions are right.
    pub fn correct_count(&self) -> usize {
        (0..XOR_LEN).filter(|&i| self.is_correct(i)).count()
    }

    /// The share of right predictions, in percent.
    pub fn accuracy(&self) -> f64 {
        self.correct_count() as f64 / XOR_LEN as f64 * 100.
    }

    /// Whether every prediction is right.
    pub fn all_correct(&self) -> bool {
        self.correct_count() == XOR_LEN
    }
}

/// An immutable copy of everything the renderer needs, taken between two steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub params: NetworkParams,
    pub state: TrainingState,
    /// The forward pass of the last example processed, none right after a reset.
    pub last_pass: Option<ForwardResult>,
    pub running: bool,
    pub learning_rate: f64,
    pub speed: Speed,
}

impl Snapshot {
    /// The forward pass of the `i`-th XOR example on these parameters. Indices past
    /// the end pick the last example.
    pub fn pass_for(&self, i: usize) -> ForwardResult {
        self.params.forward(XOR[i.min(XOR_LEN - 1)].inputs)
    }
}
