//! Pitchscope - FFT Spectral Analysis and Pitch Detection Core
//!
//! In-place radix-2 FFT engine with peak picking and three pitch
//! estimators (spectral peak, harmonic product spectrum, autocorrelation).

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod pitch;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use pitch::{DetectionMethod, PitchAnalyzer, PitchConfig, PitchReport};
pub use spectrum::{Direction, FftEngine, FftError, SpectrumAnalyzer, WindowType};
