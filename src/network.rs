use std::num::NonZeroUsize;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    activation::{sigmoid, sigmoid_prime_from_output},
    error::{PlaygroundErr, Result},
    init::{ParamGen, RandParamGen},
};

/// The amount of inputs every network takes.
pub const INPUTS: usize = 2;

/// Weights and biases of a `2 -> H -> 1` fully connected network.
///
/// Every per-unit vector always has the same length `H`, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    hidden_weights: Vec<[f64; INPUTS]>,
    hidden_biases: Vec<f64>,
    output_weights: Vec<f64>,
    output_bias: f64,
}

impl NetworkParams {
    /// Creates a new `NetworkParams` from explicit values.
    ///
    /// # Arguments
    /// * `hidden_weights` - One row per hidden unit, one weight per input.
    /// * `hidden_biases` - One bias per hidden unit.
    /// * `output_weights` - One weight per hidden unit feeding the output neuron.
    /// * `output_bias` - The output neuron's bias.
    ///
    /// # Returns
    /// An error if the hidden layer is empty or the lengths disagree.
    pub fn new(
        hidden_weights: Vec<[f64; INPUTS]>,
        hidden_biases: Vec<f64>,
        output_weights: Vec<f64>,
        output_bias: f64,
    ) -> Result<Self> {
        let expected = hidden_weights.len();
        if expected == 0 {
            return Err(PlaygroundErr::EmptyHiddenLayer);
        }

        for (what, got) in [
            ("hidden_biases", hidden_biases.len()),
            ("output_weights", output_weights.len()),
        ] {
            if got != expected {
                return Err(PlaygroundErr::ShapeMismatch {
                    what,
                    got,
                    expected,
                });
            }
        }

        Ok(Self {
            hidden_weights,
            hidden_biases,
            output_weights,
            output_bias,
        })
    }

    /// Draws every parameter from `param_gen`, hidden weight rows first, then hidden
    /// biases, output weights and finally the output bias.
    ///
    /// # Arguments
    /// * `hidden_units` - The width of the hidden layer.
    /// * `param_gen` - Where the initial values come from.
    ///
    /// # Returns
    /// An error if the generator runs dry.
    pub fn generate(hidden_units: NonZeroUsize, param_gen: &mut dyn ParamGen) -> Result<Self> {
        let hidden_units = hidden_units.get();

        let flat = take(param_gen, hidden_units * INPUTS)?;
        let hidden_weights = flat
            .chunks_exact(INPUTS)
            .map(|row| [row[0], row[1]])
            .collect();

        let hidden_biases = take(param_gen, hidden_units)?;
        let output_weights = take(param_gen, hidden_units)?;
        let output_bias = take(param_gen, 1)?[0];

        Self::new(hidden_weights, hidden_biases, output_weights, output_bias)
    }

    /// The width of the hidden layer.
    pub fn hidden_units(&self) -> usize {
        self.hidden_weights.len()
    }

    pub fn hidden_weights(&self) -> &[[f64; INPUTS]] {
        &self.hidden_weights
    }

    pub fn hidden_biases(&self) -> &[f64] {
        &self.hidden_biases
    }

    pub fn output_weights(&self) -> &[f64] {
        &self.output_weights
    }

    pub fn output_bias(&self) -> f64 {
        self.output_bias
    }

    /// Runs the forward pass for `inputs` without touching any state.
    pub fn forward(&self, inputs: [f64; INPUTS]) -> ForwardResult {
        let hidden_pre: Vec<f64> = self
            .hidden_weights
            .iter()
            .zip(&self.hidden_biases)
            .map(|(w, b)| inputs[0] * w[0] + inputs[1] * w[1] + b)
            .collect();

        let hidden: Vec<f64> = hidden_pre.iter().map(|&z| sigmoid(z)).collect();

        let output_pre = hidden
            .iter()
            .zip(&self.output_weights)
            .map(|(a, w)| a * w)
            .sum::<f64>()
            + self.output_bias;

        ForwardResult {
            inputs,
            hidden_pre,
            hidden,
            output_pre,
            output: sigmoid(output_pre),
        }
    }
}

/// Everything computed during a single forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardResult {
    /// The inputs this pass was computed for.
    pub inputs: [f64; INPUTS],
    /// Hidden pre-activations, `z1`.
    pub hidden_pre: Vec<f64>,
    /// Hidden activations, `a1 = sigmoid(z1)`.
    pub hidden: Vec<f64>,
    /// Output pre-activation, `z2`.
    pub output_pre: f64,
    /// The network's prediction, `a2 = sigmoid(z2)`.
    pub output: f64,
}

/// A `2 -> H -> 1` sigmoid network trained by per-example gradient descent.
#[derive(Debug, Clone)]
pub struct Network {
    params: NetworkParams,
}

impl Network {
    /// Creates a network with every weight and bias drawn independently from
    /// `uniform[-1, 1)`, in `NetworkParams::generate` order.
    ///
    /// # Arguments
    /// * `hidden_units` - The width of the hidden layer.
    /// * `rng` - The random number generator to draw from.
    pub fn new<R: Rng + ?Sized>(hidden_units: NonZeroUsize, rng: &mut R) -> Self {
        let mut param_gen = RandParamGen::symmetric(rng);

        match NetworkParams::generate(hidden_units, &mut param_gen) {
            Ok(params) => Self::from_params(params),
            Err(_) => unreachable!("a uniform generator never runs dry"),
        }
    }

    /// Wraps already built parameters.
    pub fn from_params(params: NetworkParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn hidden_units(&self) -> usize {
        self.params.hidden_units()
    }

    pub fn forward(&self, inputs: [f64; INPUTS]) -> ForwardResult {
        self.params.forward(inputs)
    }

    /// Backpropagates the squared error of `pass` against `target` and takes one
    /// gradient descent step of length `learning_rate`.
    ///
    /// `pass` must come from `forward` on the current parameters, otherwise the
    /// gradients are meaningless.
    ///
    /// # Arguments
    /// * `pass` - The forward pass of the example being learned.
    /// * `target` - The expected output for `pass.inputs`.
    /// * `learning_rate` - The step size.
    ///
    /// # Returns
    /// The squared error of the prediction before the update.
    pub fn backward(&mut self, pass: &ForwardResult, target: f64, learning_rate: f64) -> f64 {
        let params = &mut self.params;

        let error = pass.output - target;
        let d2 = error * sigmoid_prime_from_output(pass.output);

        // Hidden deltas read the output weights before they move.
        let d1: Vec<f64> = params
            .output_weights
            .iter()
            .zip(&pass.hidden)
            .map(|(w, &a)| d2 * w * sigmoid_prime_from_output(a))
            .collect();

        for (w, a) in params.output_weights.iter_mut().zip(&pass.hidden) {
            *w -= learning_rate * d2 * a;
        }
        params.output_bias -= learning_rate * d2;

        for ((row, b), d) in params
            .hidden_weights
            .iter_mut()
            .zip(params.hidden_biases.iter_mut())
            .zip(d1)
        {
            for (w, x) in row.iter_mut().zip(pass.inputs) {
                *w -= learning_rate * d * x;
            }
            *b -= learning_rate * d;
        }

        error * error
    }
}

fn take(param_gen: &mut dyn ParamGen, n: usize) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(n);

    while values.len() < n {
        match param_gen.sample(n - values.len()) {
            Some(sample) if !sample.is_empty() => values.extend(sample),
            _ => return Err(PlaygroundErr::ParamGenExhausted { needed: n }),
        }
    }

    Ok(values)
}
