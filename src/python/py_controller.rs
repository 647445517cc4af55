//! Python callables as controllers.

use pyo3::prelude::*;

use crate::controller::Controller;
use crate::core::{EnvError, Result};

/// Wraps a Python callable `f(inputs: list[float]) -> list[float]`.
///
/// A `neat` network's `activate` method fits this signature directly.
pub struct PyController {
    callback: PyObject,
}

impl PyController {
    pub fn new(callback: PyObject) -> Self {
        Self { callback }
    }
}

impl Controller for PyController {
    fn activate(&self, inputs: &[f32]) -> Result<Vec<f32>> {
        Python::with_gil(|py| {
            let result = self
                .callback
                .call1(py, (inputs.to_vec(),))
                .map_err(|e| EnvError::Controller(e.to_string()))?;
            result.extract::<Vec<f32>>(py).map_err(|e| {
                EnvError::Controller(format!("controller must return a list of floats: {e}"))
            })
        })
    }
}
