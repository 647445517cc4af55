//! The controller boundary.
//!
//! A controller is whatever the external search process evolves: a function
//! from a sensor vector to an output vector. The environments depend only on
//! this signature, never on how the controller was built.

use crate::core::{EnvError, Result};

/// Maps a sensor vector to raw outputs.
///
/// Implementations should be pure: the same inputs give the same outputs.
/// Returning `Err` aborts the episode with that error.
pub trait Controller {
    /// Run the controller on one sensor vector.
    fn activate(&self, inputs: &[f32]) -> Result<Vec<f32>>;
}

impl<C: Controller + ?Sized> Controller for &C {
    fn activate(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        (**self).activate(inputs)
    }
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn activate(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        (**self).activate(inputs)
    }
}

/// Adapts a closure into a controller.
///
/// ```
/// use evo_arcade::controller::{Controller, FnController};
///
/// let c = FnController::new(|inputs: &[f32]| vec![inputs[0] * 2.0]);
/// assert_eq!(c.activate(&[1.5]).unwrap(), vec![3.0]);
/// ```
#[derive(Clone)]
pub struct FnController<F> {
    f: F,
}

impl<F: Fn(&[f32]) -> Vec<f32>> FnController<F> {
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: Fn(&[f32]) -> Vec<f32>> Controller for FnController<F> {
    fn activate(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        Ok((self.f)(inputs))
    }
}

/// Always returns the same outputs (baseline for testing).
#[derive(Clone, Debug, Default)]
pub struct ConstantController {
    outputs: Vec<f32>,
}

impl ConstantController {
    /// Controller that always returns `outputs`.
    pub fn new(outputs: Vec<f32>) -> Self {
        Self { outputs }
    }

    /// One-hot controller that always picks `action` out of `action_count`.
    pub fn one_hot(action: usize, action_count: usize) -> Self {
        let mut outputs = vec![0.0; action_count];
        if let Some(slot) = outputs.get_mut(action) {
            *slot = 1.0;
        }
        Self { outputs }
    }
}

impl Controller for ConstantController {
    fn activate(&self, _inputs: &[f32]) -> Result<Vec<f32>> {
        Ok(self.outputs.clone())
    }
}

/// Single dense layer: `outputs = weights · inputs + bias`.
///
/// Small enough to hand-tune in tests and benches.
#[derive(Clone, Debug)]
pub struct LinearController {
    input_len: usize,
    /// Row-major, one row per output.
    weights: Vec<f32>,
    bias: Vec<f32>,
}

impl LinearController {
    /// Create a layer from row-major weights (`bias.len()` rows of `input_len`).
    pub fn new(input_len: usize, weights: Vec<f32>, bias: Vec<f32>) -> Result<Self> {
        if weights.len() != input_len * bias.len() {
            return Err(EnvError::InvalidConfig(
                "weight matrix does not match input and bias sizes",
            ));
        }
        Ok(Self { input_len, weights, bias })
    }

    /// Number of outputs.
    #[must_use]
    pub fn output_len(&self) -> usize {
        self.bias.len()
    }
}

impl Controller for LinearController {
    fn activate(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        if inputs.len() != self.input_len {
            return Err(EnvError::Controller(format!(
                "linear controller expects {} inputs, got {}",
                self.input_len,
                inputs.len()
            )));
        }
        let outputs = self
            .bias
            .iter()
            .enumerate()
            .map(|(row, b)| {
                let weights = &self.weights[row * self.input_len..(row + 1) * self.input_len];
                b + weights.iter().zip(inputs).map(|(w, x)| w * x).sum::<f32>()
            })
            .collect();
        Ok(outputs)
    }
}
