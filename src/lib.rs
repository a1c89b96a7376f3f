pub mod activation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod headless;
pub mod init;
pub mod inspect;
pub mod network;
pub mod progress;
pub mod training;

pub use config::PlaygroundConfig;
pub use error::{PlaygroundErr, Result};
pub use network::{ForwardResult, Network, NetworkParams};
pub use training::{Controller, Snapshot, Speed, Trainer, TrainingState};
