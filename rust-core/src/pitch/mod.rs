//! Pitch detection built on the FFT engine
//!
//! Three independent estimators (spectral peak, harmonic product spectrum,
//! autocorrelation) run on the same frame; their agreement gives a
//! confidence score.

pub mod confidence;
pub mod detectors;
pub mod notes;

use std::fmt;

use num_complex::Complex;

use crate::spectrum::fft::{FftEngine, FftError};
use crate::spectrum::windowing::{apply_window_inplace, WindowType};

pub use confidence::combine_confidence;
pub use detectors::{detect_pitch_autocorr, detect_pitch_hps, detect_pitch_peak};
pub use notes::{nearest_note, NoteMatch};

/// Pitch detection method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMethod {
    /// Strongest spectral peak with parabolic interpolation
    Peak,

    /// Harmonic product spectrum
    Hps,

    /// Autocorrelation via the power spectrum
    #[default]
    Autocorrelation,
}

impl DetectionMethod {
    pub const ALL: [DetectionMethod; 3] = [
        DetectionMethod::Peak,
        DetectionMethod::Hps,
        DetectionMethod::Autocorrelation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetectionMethod::Peak => "Maximum Peak",
            DetectionMethod::Hps => "HPS",
            DetectionMethod::Autocorrelation => "Autocorrelation",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pitch analyzer configuration
#[derive(Debug, Clone)]
pub struct PitchConfig {
    /// Frame length (must be a power of 2)
    pub fft_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Window applied before the spectral methods
    pub window_type: WindowType,

    /// Harmonics multiplied in by the HPS method
    pub hps_harmonics: usize,

    /// Estimate reported as the frame's frequency
    pub method: DetectionMethod,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            sample_rate: 44100.0,
            window_type: WindowType::Hann,
            hps_harmonics: 3,
            method: DetectionMethod::Autocorrelation,
        }
    }
}

/// Estimates for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct PitchReport {
    /// Peak-method estimate in Hz
    pub peak: f64,

    /// HPS estimate in Hz
    pub hps: f64,

    /// Autocorrelation estimate in Hz
    pub autocorrelation: f64,

    /// Agreement of the three estimates, 0 when none found a pitch
    pub confidence: f64,

    /// Method whose estimate is reported as `frequency`
    pub method: DetectionMethod,
}

impl PitchReport {
    /// Estimate of a specific method
    pub fn estimate(&self, method: DetectionMethod) -> f64 {
        match method {
            DetectionMethod::Peak => self.peak,
            DetectionMethod::Hps => self.hps,
            DetectionMethod::Autocorrelation => self.autocorrelation,
        }
    }

    /// Estimate of the configured method
    pub fn frequency(&self) -> f64 {
        self.estimate(self.method)
    }

    /// Nearest note to the reported frequency
    pub fn note(&self) -> Option<NoteMatch> {
        nearest_note(self.frequency())
    }
}

/// Runs all three detectors on a frame
pub struct PitchAnalyzer {
    config: PitchConfig,
    fft_engine: FftEngine,
}

impl PitchAnalyzer {
    /// Create new pitch analyzer
    ///
    /// Fails if `config.fft_size` is not a power of two.
    pub fn new(config: PitchConfig) -> Result<Self, FftError> {
        let fft_engine = FftEngine::new(config.fft_size)?;
        Ok(Self { config, fft_engine })
    }

    /// Analyse one frame
    ///
    /// The spectral methods see a windowed copy of the frame, the
    /// autocorrelation method sees it unwindowed.
    ///
    /// # Arguments
    /// * `frame` - Time-domain samples (zero-padded to fft_size, longer frames are rejected)
    pub fn analyze(&self, frame: &[f64]) -> Result<PitchReport, FftError> {
        let signal = self.fft_engine.complex_buffer(frame)?;
        self.analyze_complex(&signal)
    }

    /// Analyse a frame already promoted to complex samples
    pub fn analyze_complex(&self, signal: &[Complex<f64>]) -> Result<PitchReport, FftError> {
        let sample_rate = self.config.sample_rate;

        let mut spectrum = signal.to_vec();
        apply_window_inplace(&mut spectrum, self.config.window_type);
        self.fft_engine.forward(&mut spectrum)?;

        let peak = detect_pitch_peak(&spectrum, sample_rate);
        let hps = detect_pitch_hps(&spectrum, sample_rate, self.config.hps_harmonics);
        let autocorrelation = detect_pitch_autocorr(signal, sample_rate)?;

        Ok(PitchReport {
            peak,
            hps,
            autocorrelation,
            confidence: combine_confidence(&[peak, hps, autocorrelation]),
            method: self.config.method,
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &PitchConfig {
        &self.config
    }
}
