//! Test-signal synthesis

use rand::Rng;
use std::f64::consts::PI;

/// Pure sine
pub fn sine(freq_hz: f64, sample_rate: f64, n: usize, amplitude: f64) -> Vec<f64> {
    (0..n)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
        .collect()
}

/// Harmonic tone: Σ a_h·sin(2π·h·f·t)
///
/// # Arguments
/// * `freq_hz` - Fundamental frequency
/// * `sample_rate` - Sample rate in Hz
/// * `n` - Number of samples
/// * `amplitudes` - Amplitude of each harmonic, fundamental first.
///   `None` gives five harmonics with amplitude 1/h.
pub fn musical_note(freq_hz: f64, sample_rate: f64, n: usize, amplitudes: Option<&[f64]>) -> Vec<f64> {
    let default_amps: Vec<f64> = (1..=5).map(|h| 1.0 / h as f64).collect();
    let amps = amplitudes.unwrap_or(&default_amps[..]);

    (0..n)
        .map(|i| {
            amps.iter()
                .enumerate()
                .map(|(h, &amp)| {
                    let harmonic = (h + 1) as f64;
                    amp * (2.0 * PI * freq_hz * harmonic * i as f64 / sample_rate).sin()
                })
                .sum()
        })
        .collect()
}

/// Sum of unit-amplitude sines
pub fn chord(freqs_hz: &[f64], sample_rate: f64, n: usize) -> Vec<f64> {
    let mut signal = vec![0.0; n];
    for &freq in freqs_hz {
        for (s, tone) in signal.iter_mut().zip(sine(freq, sample_rate, n, 1.0)) {
            *s += tone;
        }
    }
    signal
}

/// Add uniform noise in [-amplitude/2, amplitude/2)
pub fn add_uniform_noise<R: Rng>(signal: &mut [f64], amplitude: f64, rng: &mut R) {
    for s in signal.iter_mut() {
        *s += amplitude * (rng.random::<f64>() - 0.5);
    }
}

/// Quantise to 16-bit PCM, clipping to [-1, 1]
pub fn to_pcm16(signal: &[f64]) -> Vec<i16> {
    signal
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f64).round() as i16)
        .collect()
}
