//! Fundamental-frequency estimators
//!
//! Every detector returns 0 Hz when it finds nothing in its search range.

use num_complex::Complex;

use crate::spectrum::analysis::{bin_to_frequency, frequency_to_bin, magnitude_spectrum};
use crate::spectrum::fft::{transform, Direction, FftError};

/// Search range of the peak method
pub const PEAK_MIN_HZ: f64 = 80.0;
pub const PEAK_MAX_HZ: f64 = 2000.0;

/// Search range of the harmonic product spectrum
pub const HPS_MIN_HZ: f64 = 80.0;
pub const HPS_MAX_HZ: f64 = 1000.0;

/// Search range of the autocorrelation method
pub const AUTOCORR_MIN_HZ: f64 = 80.0;
pub const AUTOCORR_MAX_HZ: f64 = 1000.0;

/// Index of the largest strictly positive value, first one wins on ties
fn argmax_positive(values: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    let mut best = 0.0;
    let mut best_index = None;
    for (i, v) in values {
        if v > best {
            best = v;
            best_index = Some(i);
        }
    }
    best_index
}

/// Strongest spectral peak, refined by parabolic interpolation
///
/// Searches [80 Hz, 2000 Hz] of the forward spectrum of a windowed frame.
/// When the winning bin has both neighbours inside the half spectrum and is
/// a local maximum its position is refined with
/// δ = 0.5·(y₋₁ − y₊₁)/(y₋₁ − 2y₀ + y₊₁).
/// A winner at the edge of the search range that is still rising towards
/// a neighbour outside it is reported unrefined.
///
/// # Arguments
/// * `spectrum` - Forward FFT of length N
/// * `sample_rate` - Sample rate in Hz
pub fn detect_pitch_peak(spectrum: &[Complex<f64>], sample_rate: f64) -> f64 {
    let n = spectrum.len();
    let magnitude = magnitude_spectrum(spectrum);

    let min_bin = frequency_to_bin(PEAK_MIN_HZ, n, sample_rate);
    let max_bin = frequency_to_bin(PEAK_MAX_HZ, n, sample_rate).min(n / 2);

    let peak_bin = match argmax_positive((min_bin..max_bin).map(|i| (i, magnitude[i]))) {
        Some(bin) => bin,
        None => return 0.0,
    };

    let mut refined = peak_bin as f64;
    if peak_bin > 0 && peak_bin + 1 < n / 2 {
        let y1 = magnitude[peak_bin - 1];
        let y2 = magnitude[peak_bin];
        let y3 = magnitude[peak_bin + 1];

        let denominator = y1 - 2.0 * y2 + y3;
        if y2 >= y1 && y2 >= y3 && denominator < 0.0 {
            refined += 0.5 * (y1 - y3) / denominator;
        }
    }

    bin_to_frequency(refined, n, sample_rate)
}

/// Harmonic product spectrum
///
/// Multiplies the magnitude spectrum by copies of itself downsampled by
/// 2..=`harmonics`, so bins whose harmonics line up are reinforced, then
/// picks the strongest bin in [80 Hz, 1000 Hz]. The search stops at
/// N/(2·harmonics), the last bin every downsampled copy covers.
///
/// # Arguments
/// * `spectrum` - Forward FFT of length N
/// * `sample_rate` - Sample rate in Hz
/// * `harmonics` - Number of harmonics multiplied in (1 = plain magnitude),
///   capped at N/2
pub fn detect_pitch_hps(spectrum: &[Complex<f64>], sample_rate: f64, harmonics: usize) -> f64 {
    let n = spectrum.len();
    if n < 2 {
        return 0.0;
    }
    let harmonics = harmonics.clamp(1, n / 2);
    let magnitude = magnitude_spectrum(spectrum);

    let mut hps = magnitude[..=n / 2].to_vec();
    for h in 2..=harmonics {
        for i in 0..=n / (2 * h) {
            hps[i] *= magnitude[i * h];
        }
    }

    let min_bin = frequency_to_bin(HPS_MIN_HZ, n, sample_rate);
    let max_bin = frequency_to_bin(HPS_MAX_HZ, n, sample_rate).min(n / (2 * harmonics));

    match argmax_positive((min_bin..max_bin).map(|i| (i, hps[i]))) {
        Some(bin) => bin_to_frequency(bin as f64, n, sample_rate),
        None => 0.0,
    }
}

/// Autocorrelation via the power spectrum
///
/// Transforms a copy of the unwindowed frame, replaces each bin by
/// X·conj(X) and inverse-transforms, giving the circular autocorrelation.
/// The strongest lag in [sample_rate/1000, sample_rate/80] (lag 0 excluded)
/// is the period.
///
/// # Arguments
/// * `signal` - Time-domain frame, length a power of two
/// * `sample_rate` - Sample rate in Hz
///
/// # Errors
/// `FftError::InvalidSize` if the frame length is not a power of two.
pub fn detect_pitch_autocorr(signal: &[Complex<f64>], sample_rate: f64) -> Result<f64, FftError> {
    let n = signal.len();
    let mut correlation = signal.to_vec();

    transform(&mut correlation, Direction::Forward)?;
    for bin in correlation.iter_mut() {
        let conj = bin.conj();
        *bin *= conj;
    }
    transform(&mut correlation, Direction::Inverse)?;

    let min_lag = ((sample_rate / AUTOCORR_MAX_HZ) as usize).max(1);
    let max_lag = ((sample_rate / AUTOCORR_MIN_HZ) as usize).min(n / 2);

    let frequency = match argmax_positive((min_lag..max_lag).map(|lag| (lag, correlation[lag].re))) {
        Some(lag) => sample_rate / lag as f64,
        None => 0.0,
    };
    Ok(frequency)
}
