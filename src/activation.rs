/// Pre-activations are clamped to this magnitude before exponentiating.
pub const SIGMOID_CLAMP: f64 = 500.;

/// The logistic function `1 / (1 + e^-z)`, with `z` clamped to `[-500, 500]` so the
/// exponential can't overflow.
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP);
    1. / (1. + (-z).exp())
}

/// The derivative of `sigmoid` at `z`.
pub fn sigmoid_prime(z: f64) -> f64 {
    sigmoid_prime_from_output(sigmoid(z))
}

/// The derivative of `sigmoid` expressed through its already evaluated output `s`.
pub fn sigmoid_prime_from_output(s: f64) -> f64 {
    s * (1. - s)
}
