//! Cache simulator Python binding.
//!
//! Exposes a simulation to Python: build from a config dict and a trace
//! file, replay it, step single accesses, and read back the report.

use crate::conversion::{py_dict_to_config, sim_error_to_py, to_py_object};
use cachesim::CacheHierarchy;
use cachesim::common::address::Address;
use cachesim::config::SimConfig;
use cachesim::sim::report::Report;
use cachesim::sim::trace::{Operation, Trace};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python-exposed simulation: wraps a `CacheHierarchy` and its trace.
#[pyclass]
pub struct PyCacheSim {
    inner: CacheHierarchy,
    config: SimConfig,
    trace_file: String,
}

#[pymethods]
impl PyCacheSim {
    /// Creates a simulation for `config_dict` over the trace at `trace_path`.
    ///
    /// # Errors
    /// Returns a `ValueError` for a rejected configuration or malformed trace
    /// and an `OSError` if the trace cannot be read.
    #[new]
    fn new(py: Python, config_dict: &Bound<'_, PyAny>, trace_path: String) -> PyResult<Self> {
        let config = py_dict_to_config(py, config_dict)?;
        let trace = Trace::load(&trace_path, config.address_bits).map_err(sim_error_to_py)?;
        let inner = CacheHierarchy::new(&config, trace).map_err(sim_error_to_py)?;

        Ok(PyCacheSim {
            inner,
            config,
            trace_file: trace_path,
        })
    }

    /// Replays the whole trace.
    pub fn run(&mut self) {
        self.inner.run();
    }

    /// Sends one access (`"r"` or `"w"`) into L1. Returns whether L1 hit.
    #[pyo3(signature = (op, address, trace_index=0))]
    pub fn access(&mut self, op: &str, address: u64, trace_index: usize) -> PyResult<bool> {
        let op = Operation::from_code(op)
            .ok_or_else(|| PyValueError::new_err(format!("unknown operation '{}'", op)))?;
        Ok(self.inner.access(op, Address::new(address), trace_index).hit)
    }

    /// Number of entries in the loaded trace.
    pub fn trace_len(&self) -> usize {
        self.inner.trace().len()
    }

    /// Returns the full report (configuration, statistics and contents) as a dict.
    pub fn report(&self, py: Python) -> PyResult<PyObject> {
        let report = Report::new(&self.config, &self.inner).with_trace_file(self.trace_file.clone());
        to_py_object(py, &report)
    }

    /// Returns the counters of every level as a list of dicts, L1 first.
    pub fn get_stats(&self, py: Python) -> PyResult<PyObject> {
        let stats: Vec<_> = self.inner.levels().iter().map(|l| *l.stats()).collect();
        to_py_object(py, &stats)
    }
}
