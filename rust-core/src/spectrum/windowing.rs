//! Window functions for spectral analysis
//!
//! Applies an envelope to time-domain frames before the FFT to reduce
//! spectral leakage.

use num_complex::Complex;
use std::f64::consts::PI;
use std::fmt;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

impl WindowType {
    /// Window coefficient at sample `n` of an `m`-sample window
    pub fn coefficient(&self, n: usize, m: usize) -> f64 {
        if m < 2 {
            return 1.0;
        }
        let angle = 2.0 * PI * n as f64 / (m - 1) as f64;
        match self {
            WindowType::Hann => 0.5 - 0.5 * angle.cos(),
            WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
            WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
            WindowType::Rectangular => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    (0..length)
        .map(|n| window_type.coefficient(n, length))
        .collect()
}

/// Apply window to a complex buffer in place
pub fn apply_window_inplace(buffer: &mut [Complex<f64>], window_type: WindowType) {
    let m = buffer.len();
    for (n, sample) in buffer.iter_mut().enumerate() {
        *sample *= window_type.coefficient(n, m);
    }
}

/// Calculate window correction factor
///
/// Windowing reduces the amplitude of a tone's spectral peak; multiplying
/// the magnitude by this factor restores it.
pub fn window_correction_factor(window_type: WindowType, length: usize) -> f64 {
    let sum: f64 = generate_window(window_type, length).iter().sum();
    if sum == 0.0 {
        return 1.0;
    }
    length as f64 / sum
}
