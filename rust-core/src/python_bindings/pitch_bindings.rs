//! Python bindings for pitch detection

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use numpy::PyReadonlyArray1;
use crate::pitch::{DetectionMethod, PitchAnalyzer, PitchConfig};
use super::spectrum_bindings::PyWindowType;

/// Detection method enum exposed to Python
#[pyclass(name = "DetectionMethod")]
#[derive(Clone)]
pub enum PyDetectionMethod {
    Peak,
    Hps,
    Autocorrelation,
}

impl From<PyDetectionMethod> for DetectionMethod {
    fn from(py_method: PyDetectionMethod) -> Self {
        match py_method {
            PyDetectionMethod::Peak => DetectionMethod::Peak,
            PyDetectionMethod::Hps => DetectionMethod::Hps,
            PyDetectionMethod::Autocorrelation => DetectionMethod::Autocorrelation,
        }
    }
}

/// Pitch analyzer exposed to Python
#[pyclass(name = "PitchAnalyzer")]
pub struct PyPitchAnalyzer {
    analyzer: PitchAnalyzer,
}

#[pymethods]
impl PyPitchAnalyzer {
    /// Create a new pitch analyzer
    ///
    /// Args:
    ///     fft_size: Frame length (must be a power of 2)
    ///     sample_rate: Sample rate in Hz
    ///     window_type: Window applied before the spectral methods
    ///     hps_harmonics: Harmonics used by the HPS method
    ///     method: Estimate reported as the frame's frequency
    #[new]
    #[pyo3(signature = (fft_size=4096, sample_rate=44100.0, window_type=PyWindowType::Hann, hps_harmonics=3, method=PyDetectionMethod::Autocorrelation))]
    fn new(
        fft_size: usize,
        sample_rate: f64,
        window_type: PyWindowType,
        hps_harmonics: usize,
        method: PyDetectionMethod,
    ) -> PyResult<Self> {
        let config = PitchConfig {
            fft_size,
            sample_rate,
            window_type: window_type.into(),
            hps_harmonics,
            method: method.into(),
        };

        let analyzer = PitchAnalyzer::new(config)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { analyzer })
    }

    /// Analyse one frame
    ///
    /// Returns:
    ///     Tuple of (frequency, confidence, note) where note is None when
    ///     no pitch was found
    fn analyze(&self, signal: PyReadonlyArray1<f64>) -> PyResult<(f64, f64, Option<String>)> {
        let sig = signal
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let report = self
            .analyzer
            .analyze(sig)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        Ok((
            report.frequency(),
            report.confidence,
            report.note().map(|n| n.to_string()),
        ))
    }

    /// Estimates of all three methods
    ///
    /// Returns:
    ///     Tuple of (peak_hz, hps_hz, autocorrelation_hz)
    fn estimates(&self, signal: PyReadonlyArray1<f64>) -> PyResult<(f64, f64, f64)> {
        let sig = signal
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let report = self
            .analyzer
            .analyze(sig)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        Ok((report.peak, report.hps, report.autocorrelation))
    }
}
