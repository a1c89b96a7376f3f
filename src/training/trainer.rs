use std::num::NonZeroUsize;

use log::{debug, info};
use rand::rngs::StdRng;

use super::{
    speed::Speed,
    state::{Snapshot, TrainingState},
};
use crate::{
    dataset::XOR,
    network::{ForwardResult, Network},
    progress::StepCompletion,
};

/// Trains a network on XOR one sweep at a time.
///
/// Everything here is synchronous, scheduling the sweeps is the `Controller`'s job.
pub struct Trainer {
    network: Network,
    hidden_units: NonZeroUsize,
    learning_rate: f64,
    state: TrainingState,
    last_pass: Option<ForwardResult>,
    rng: StdRng,
    on_converged: Option<Box<dyn StepCompletion>>,
}

impl Trainer {
    /// Creates a new `Trainer` with a freshly randomized network.
    ///
    /// # Arguments
    /// * `hidden_units` - The width of the hidden layer.
    /// * `learning_rate` - The gradient descent step size.
    /// * `rng` - Used for this and every later initialization.
    pub fn new(hidden_units: NonZeroUsize, learning_rate: f64, mut rng: StdRng) -> Self {
        let network = Network::new(hidden_units, &mut rng);
        Self::from_network(network, learning_rate, rng)
    }

    /// Creates a new `Trainer` around an existing network. Later resets draw
    /// from `rng`.
    pub fn from_network(network: Network, learning_rate: f64, rng: StdRng) -> Self {
        let hidden_units = NonZeroUsize::new(network.hidden_units()).unwrap_or(NonZeroUsize::MIN);

        Self {
            network,
            hidden_units,
            learning_rate,
            state: TrainingState::default(),
            last_pass: None,
            rng,
            on_converged: None,
        }
    }

    /// Registers the hook fired the first time the network converges after each reset.
    pub fn with_completion<C: StepCompletion + 'static>(mut self, hook: C) -> Self {
        self.on_converged = Some(Box::new(hook));
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    pub fn last_pass(&self) -> Option<&ForwardResult> {
        self.last_pass.as_ref()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// Runs one epoch: a forward and a backward pass for each XOR example, in order.
    ///
    /// # Returns
    /// The updated training state.
    pub fn train_step(&mut self) -> &TrainingState {
        let lr = self.learning_rate;
        let mut total_loss = 0.;
        let mut predictions = [0.; XOR.len()];
        let mut last_pass = None;

        for (sample, prediction) in XOR.iter().zip(predictions.iter_mut()) {
            let pass = self.network.forward(sample.inputs);
            *prediction = pass.output;
            total_loss += self.network.backward(&pass, sample.target, lr);
            last_pass = Some(pass);
        }

        self.last_pass = last_pass;
        self.state.epoch += 1;
        self.state.total_loss = total_loss;
        self.state.predictions = predictions;

        debug!(epoch = self.state.epoch, loss = total_loss; "epoch done");

        if !self.state.converged && self.state.all_correct() {
            self.state.converged = true;
            info!(epoch = self.state.epoch, loss = total_loss; "network converged");

            if let Some(hook) = self.on_converged.as_mut() {
                hook.mark_step_complete();
            }
        }

        &self.state
    }

    /// Copies out everything a renderer needs.
    pub fn snapshot(&self, running: bool, speed: Speed) -> Snapshot {
        Snapshot {
            params: self.network.params().clone(),
            state: self.state.clone(),
            last_pass: self.last_pass.clone(),
            running,
            learning_rate: self.learning_rate,
            speed,
        }
    }

    /// Throws the network away for a freshly randomized one and clears the state.
    pub fn reset(&mut self) {
        self.network = Network::new(self.hidden_units, &mut self.rng);
        self.state = TrainingState::default();
        self.last_pass = None;

        debug!(hidden_units = self.hidden_units.get(); "network reset");
    }
}
