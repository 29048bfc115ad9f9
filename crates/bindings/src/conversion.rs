//! Conversions between Python objects and simulator types.
//!
//! Python dicts travel through the interpreter's `json` module so the
//! simulator's serde definitions are the single source of field names and
//! defaults.

use cachesim::SimError;
use cachesim::config::SimConfig;
use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use serde::Serialize;

/// Converts a Python dict (or any JSON-serializable object) into a `SimConfig`.
///
/// # Errors
///
/// Returns a `PyValueError` if the object does not describe a valid configuration.
pub fn py_dict_to_config(py: Python<'_>, obj: &Bound<'_, PyAny>) -> PyResult<SimConfig> {
    let json = py.import("json")?;
    let text: String = json.call_method1("dumps", (obj,))?.extract()?;
    let config: SimConfig = serde_json::from_str(&text)
        .map_err(|e| PyValueError::new_err(format!("invalid configuration: {}", e)))?;
    config
        .validate()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(config)
}

/// Converts any serializable value into plain Python objects (dicts, lists, numbers).
pub fn to_py_object<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let text = serde_json::to_string(value).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    let json = py.import("json")?;
    Ok(json.call_method1("loads", (text,))?.unbind())
}

/// Maps a simulator error onto the closest Python exception.
pub fn sim_error_to_py(err: SimError) -> PyErr {
    match err {
        SimError::Io { .. } => PyOSError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}
