//! Sensor vectors and decoding of controller outputs into decisions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EnvError, Result};

/// Fixed-length sensor vector fed to a controller.
///
/// Every task produces at most 13 values, so this never spills to the heap.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    values: SmallVec<[f32; 16]>,
}

impl Observation {
    /// Create an observation from values.
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self { values: values.into_iter().collect() }
    }

    /// Sensor values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Append a value.
    pub fn push(&mut self, value: f32) {
        self.values.push(value);
    }
}

/// Shape of the decision a task expects from its controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    /// `n` outputs; the decision is the index of the largest.
    Discrete(usize),
    /// One output used as a raw scalar.
    Continuous,
}

/// A decoded controller decision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// Index of the chosen discrete action.
    Action(usize),
    /// Continuous control value.
    Value(f32),
}

impl DecisionKind {
    /// Number of outputs the controller must produce.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            DecisionKind::Discrete(n) => n,
            DecisionKind::Continuous => 1,
        }
    }

    /// Decode raw controller outputs.
    ///
    /// Rejects outputs of the wrong length or containing NaN/infinity.
    /// Ties in a discrete decision go to the lowest index.
    pub fn decode(self, outputs: &[f32]) -> Result<Decision> {
        let expected = self.output_len();
        if outputs.len() != expected {
            return Err(EnvError::OutputLength { expected, actual: outputs.len() });
        }
        if let Some(index) = outputs.iter().position(|v| !v.is_finite()) {
            return Err(EnvError::NonFiniteOutput { index });
        }

        match self {
            DecisionKind::Discrete(_) => Ok(Decision::Action(argmax(outputs))),
            DecisionKind::Continuous => Ok(Decision::Value(outputs[0])),
        }
    }
}

/// Index of the first maximum. `outputs` must be non-empty and finite.
fn argmax(outputs: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in outputs.iter().enumerate().skip(1) {
        if v > outputs[best] {
            best = i;
        }
    }
    best
}
