//! Python bindings for the cachesim simulator.
//!
//! Built as the `_core` extension module.

pub mod conversion;
pub mod sim;

use cachesim::common::address;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::conversion::{py_dict_to_config, sim_error_to_py, to_py_object};

/// Runs a complete simulation and returns the report as a dict.
#[pyfunction]
fn simulate(py: Python, config_dict: &Bound<'_, PyAny>, trace_path: String) -> PyResult<PyObject> {
    let config = py_dict_to_config(py, config_dict)?;
    let report = cachesim::sim::run_file(&config, &trace_path).map_err(sim_error_to_py)?;
    to_py_object(py, &report)
}

/// Splits `address` into `(tag, index, offset)` for the given geometry.
#[pyfunction]
fn decode_address(address: u64, block_size: usize, sets: usize) -> PyResult<(u64, u64, u64)> {
    if !block_size.is_power_of_two() || !sets.is_power_of_two() {
        return Err(PyValueError::new_err(
            "block_size and sets must be powers of 2",
        ));
    }
    Ok(address::decode(
        address,
        block_size.trailing_zeros(),
        sets.trailing_zeros(),
    ))
}

/// Registers the simulator classes and functions on `m`.
pub fn register_cachesim_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<sim::PyCacheSim>()?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(decode_address, m)?)?;
    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_cachesim_module(m)
}
