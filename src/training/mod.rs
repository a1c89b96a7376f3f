mod controller;
mod speed;
mod state;
mod trainer;

pub use controller::{Controller, DEFAULT_MIN_INTERVAL};
pub use speed::{clamp_learning_rate, Speed, LEARNING_RATE_MAX, LEARNING_RATE_MIN};
pub use state::{Snapshot, TrainingState};
pub use trainer::Trainer;
