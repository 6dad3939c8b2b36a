//! Spectral analysis with FFT

pub mod analysis;
pub mod display;
pub mod fft;
pub mod windowing;

pub use analysis::{
    bin_to_frequency, find_peaks, find_peaks_above, magnitude_spectrum, AnalyzerConfig, Peak,
    SpectrumAnalyzer, SpectrumFrame,
};
pub use fft::{transform, Direction, FftEngine, FftError};
pub use windowing::{apply_window_inplace, WindowType};
