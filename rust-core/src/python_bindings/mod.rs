//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod pitch_bindings;
mod spectrum_bindings;

/// Python module definition
#[pymodule]
fn pitchscope(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;
    m.add_class::<pitch_bindings::PyPitchAnalyzer>()?;

    // Enums
    m.add_class::<spectrum_bindings::PyWindowType>()?;
    m.add_class::<pitch_bindings::PyDetectionMethod>()?;

    Ok(())
}
