//! Python bindings for spectrum analysis

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::spectrum::{AnalyzerConfig, SpectrumAnalyzer, WindowType};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

/// Spectrum analyzer exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// Args:
    ///     fft_size: FFT size (must be a power of 2)
    ///     window_type: Window type for analysis
    ///     sample_rate: Sample rate in Hz
    ///     peak_threshold: Minimum magnitude for a peak
    ///     max_peaks: Maximum number of peaks returned
    #[new]
    #[pyo3(signature = (fft_size=4096, window_type=PyWindowType::Hann, sample_rate=44100.0, peak_threshold=0.1, max_peaks=10))]
    fn new(
        fft_size: usize,
        window_type: PyWindowType,
        sample_rate: f64,
        peak_threshold: f64,
        max_peaks: usize,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            fft_size,
            window_type: window_type.into(),
            sample_rate,
            peak_threshold,
            max_peaks,
        };

        let analyzer = SpectrumAnalyzer::new(config)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { analyzer })
    }

    /// Magnitude spectrum of a windowed frame
    ///
    /// Args:
    ///     signal: Input frame as numpy array
    ///
    /// Returns:
    ///     Magnitude of every bin as numpy array
    fn magnitude<'py>(
        &self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let frame = self.analyze_frame(signal)?;
        Ok(PyArray1::from_vec(py, frame.magnitude))
    }

    /// Strongest peaks of a windowed frame
    ///
    /// Returns:
    ///     List of (bin, frequency_hz, magnitude), descending magnitude
    fn peaks(&self, signal: PyReadonlyArray1<f64>) -> PyResult<Vec<(usize, f64, f64)>> {
        let frame = self.analyze_frame(signal)?;
        Ok(frame
            .peaks
            .iter()
            .map(|p| (p.bin, p.frequency, p.magnitude))
            .collect())
    }

    /// Get frequency bins in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.analyzer.frequency_bins_hz()))
    }

    /// Get number of frequency bins
    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }
}

impl PySpectrumAnalyzer {
    fn analyze_frame(&self, signal: PyReadonlyArray1<f64>) -> PyResult<crate::spectrum::SpectrumFrame> {
        let sig = signal
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        self.analyzer
            .analyze(sig)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}
