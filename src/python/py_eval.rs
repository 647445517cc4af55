//! Evaluation bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::core::{EnvError, JumpConfig, RunConfig, SeekConfig, SensingConfig, TaskConfig};
use crate::env::{Environment, Task};
use crate::eval::Evaluator;

use super::py_controller::PyController;

fn to_py_err(err: EnvError) -> PyErr {
    match err {
        EnvError::InvalidConfig(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Evaluates Python controllers on one task.
#[pyclass(name = "Evaluator")]
pub struct PyEvaluator {
    inner: Evaluator,
}

#[pymethods]
impl PyEvaluator {
    /// Create an evaluator for a built-in task with default tuning.
    ///
    /// # Arguments
    /// - task: "seek", "sensing" or "jump" (default: "seek")
    /// - max_ticks: Tick budget (default: the task's tuned budget)
    /// - seed: Base seed; population slot `i` uses `seed + i` (default: 0)
    #[new]
    #[pyo3(signature = (task = "seek", max_ticks = None, seed = 0))]
    fn new(task: &str, max_ticks: Option<usize>, seed: u64) -> PyResult<Self> {
        let task = match task {
            "seek" => TaskConfig::Seek(SeekConfig::default()),
            "sensing" => TaskConfig::Sensing(SensingConfig::default()),
            "jump" => TaskConfig::Jump(JumpConfig::default()),
            other => return Err(PyValueError::new_err(format!("unknown task: {other}"))),
        };
        let mut config = RunConfig::new(task).with_seed(seed);
        if let Some(ticks) = max_ticks {
            config = config.with_max_ticks(ticks);
        }
        Ok(Self {
            inner: Evaluator::new(config).map_err(to_py_err)?,
        })
    }

    /// Create an evaluator from a JSON run description.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = RunConfig::from_json_str(json).map_err(to_py_err)?;
        Ok(Self {
            inner: Evaluator::new(config).map_err(to_py_err)?,
        })
    }

    /// Fitness of one controller in population slot `index`.
    #[pyo3(signature = (controller, index = 0))]
    fn evaluate(&self, controller: PyObject, index: usize) -> PyResult<f64> {
        let controller = PyController::new(controller);
        let summary = self.inner.evaluate(&controller, index).map_err(to_py_err)?;
        Ok(summary.fitness)
    }

    /// Fitness of every controller, in order.
    fn evaluate_many(&self, controllers: Vec<PyObject>) -> PyResult<Vec<f64>> {
        let controllers: Vec<PyController> =
            controllers.into_iter().map(PyController::new).collect();
        self.inner.evaluate_population(&controllers).map_err(to_py_err)
    }

    /// Replay a controller, returning `(fitness, frames)`.
    ///
    /// `frames` is the bincode-encoded frame recording.
    #[pyo3(signature = (controller, index = 0))]
    fn record<'py>(
        &self,
        py: Python<'py>,
        controller: PyObject,
        index: usize,
    ) -> PyResult<(f64, Bound<'py, PyBytes>)> {
        let controller = PyController::new(controller);
        let (summary, recorder) = self.inner.record(&controller, index).map_err(to_py_err)?;
        let bytes = recorder.to_bytes().map_err(to_py_err)?;
        Ok((summary.fitness, PyBytes::new_bound(py, &bytes)))
    }

    /// Initial sensor vector for population slot `index`.
    #[pyo3(signature = (index = 0))]
    fn observe<'py>(&self, py: Python<'py>, index: usize) -> PyResult<Bound<'py, PyArray1<f32>>> {
        let task = self.task(index)?;
        Ok(PyArray1::from_slice_bound(py, task.observe().as_slice()))
    }

    /// Length of the sensor vector.
    #[getter]
    fn observation_len(&self) -> PyResult<usize> {
        Ok(self.task(0)?.observation_len())
    }

    /// Number of outputs a controller must return.
    #[getter]
    fn output_len(&self) -> PyResult<usize> {
        Ok(self.task(0)?.decision_kind().output_len())
    }

    #[getter]
    fn max_ticks(&self) -> usize {
        self.inner.config().episode.max_ticks
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "Evaluator(task={}, max_ticks={}, seed={})",
            config.task.name(),
            config.episode.max_ticks,
            config.seed
        )
    }
}

impl PyEvaluator {
    fn task(&self, index: usize) -> PyResult<Task> {
        let config = self.inner.config();
        let seed = config.seed.wrapping_add(index as u64);
        Task::new(&config.task, config.arena, seed).map_err(to_py_err)
    }
}
