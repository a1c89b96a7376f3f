use std::sync::Arc;

use log::info;
use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    config::PlaygroundConfig,
    error::Result,
    network::NetworkParams,
    progress::{Progress, StepTracker, TRAINING_LESSON},
    training::Trainer,
};

/// The outcome of a headless training run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub epochs: u64,
    pub converged: bool,
    pub total_loss: f64,
    pub predictions: Vec<f64>,
    pub accuracy: f64,
    pub lesson_completed: bool,
    pub params: NetworkParams,
}

/// Trains without any front-end until the network converges or `max_epochs` is
/// reached.
///
/// # Errors
/// Returns an error if `config` is out of range.
pub fn run(config: &PlaygroundConfig) -> Result<Report> {
    config.validate()?;

    let progress = Arc::new(Mutex::new(Progress::new()));
    progress.lock().set_current(TRAINING_LESSON);

    let tracker = StepTracker::new(progress.clone(), TRAINING_LESSON);
    let mut trainer = Trainer::new(config.hidden_units()?, config.learning_rate, config.rng())
        .with_completion(tracker);

    info!(
        hidden_units = config.hidden_units,
        learning_rate = config.learning_rate,
        max_epochs = config.max_epochs;
        "headless run started"
    );

    while trainer.state().epoch < config.max_epochs {
        let state = trainer.train_step();

        if state.epoch % config.log_every == 0 {
            info!(
                epoch = state.epoch,
                loss = state.total_loss,
                correct = state.correct_count();
                "progress"
            );
        }

        if state.converged {
            break;
        }
    }

    let state = trainer.state();
    let lesson_completed = progress.lock().is_completed(TRAINING_LESSON);
    info!(epoch = state.epoch, converged = state.converged; "headless run finished");

    Ok(Report {
        epochs: state.epoch,
        converged: state.converged,
        total_loss: state.total_loss,
        predictions: state.predictions.to_vec(),
        accuracy: state.accuracy(),
        lesson_completed,
        params: trainer.network().params().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaygroundErr;

    #[test]
    fn respects_epoch_budget() {
        let config = PlaygroundConfig {
            // A single hidden unit can't separate XOR.
            hidden_units: 1,
            seed: Some(1),
            max_epochs: 30,
            ..Default::default()
        };
        let report = run(&config).unwrap();

        assert_eq!(report.epochs, 30);
        assert!(!report.converged);
        assert!(!report.lesson_completed);
        assert_eq!(report.params.hidden_units(), 1);
    }

    #[test]
    fn same_seed_same_run() {
        let config = PlaygroundConfig {
            seed: Some(8),
            max_epochs: 200,
            ..Default::default()
        };

        let a = run(&config).unwrap();
        let b = run(&config).unwrap();
        assert_eq!(a.params, b.params);
        assert_eq!(a.total_loss, b.total_loss);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PlaygroundConfig {
            hidden_units: 0,
            ..Default::default()
        };

        assert!(matches!(run(&config), Err(PlaygroundErr::InvalidConfig(_))));
    }
}
