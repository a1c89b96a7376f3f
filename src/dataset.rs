use crate::network::INPUTS;

/// A single training example.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub inputs: [f64; INPUTS],
    pub target: f64,
}

impl Sample {
    const fn new(a: f64, b: f64, target: f64) -> Self {
        Self {
            inputs: [a, b],
            target,
        }
    }

    /// Whether `prediction` lies on the target's side of the 0.5 decision threshold.
    ///
    /// A prediction of exactly 0.5 is on neither side.
    pub fn is_correct(&self, prediction: f64) -> bool {
        if self.target == 1. {
            prediction > 0.5
        } else {
            prediction < 0.5
        }
    }
}

/// The amount of examples in the XOR truth table.
pub const XOR_LEN: usize = 4;

/// The XOR truth table, in the order every epoch visits it.
pub const XOR: [Sample; XOR_LEN] = [
    Sample::new(0., 0., 0.),
    Sample::new(0., 1., 1.),
    Sample::new(1., 0., 1.),
    Sample::new(1., 1., 0.),
];
