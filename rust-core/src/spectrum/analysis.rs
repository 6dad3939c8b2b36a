//! Magnitude spectra, peak picking and the high-level spectrum analyzer
//!
//! Combines the FFT engine with windowing to turn a frame of samples into
//! a magnitude spectrum and its strongest local maxima.

use num_complex::Complex;

use super::fft::{FftEngine, FftError};
use super::windowing::{apply_window_inplace, WindowType};

/// Minimum magnitude for a local maximum to count as a peak
///
/// Absolute, so only meaningful when the caller controls input scale.
/// Use [`find_peaks_above`] for other scales.
pub const DEFAULT_PEAK_THRESHOLD: f64 = 0.1;

/// A local maximum in a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Bin index
    pub bin: usize,

    /// Bin centre frequency in Hz
    pub frequency: f64,

    /// Magnitude at the bin
    pub magnitude: f64,
}

/// Magnitude |X[k]| of every bin
///
/// Same length as `spectrum`, which is not modified.
pub fn magnitude_spectrum(spectrum: &[Complex<f64>]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}

/// Convert a (possibly fractional) bin index to Hz
///
/// `fft_size` and `sample_rate` must be the pair that produced the spectrum.
pub fn bin_to_frequency(bin: f64, fft_size: usize, sample_rate: f64) -> f64 {
    bin * sample_rate / fft_size as f64
}

/// Convert a frequency in Hz to the bin that contains it (truncating)
pub fn frequency_to_bin(frequency: f64, fft_size: usize, sample_rate: f64) -> usize {
    (frequency * fft_size as f64 / sample_rate) as usize
}

/// Find peaks using [`DEFAULT_PEAK_THRESHOLD`]
pub fn find_peaks(magnitude: &[f64], sample_rate: f64, max_peaks: usize) -> Vec<Peak> {
    find_peaks_above(magnitude, sample_rate, max_peaks, DEFAULT_PEAK_THRESHOLD)
}

/// Find strict local maxima above `threshold`
///
/// Scans bins 1..N/2-1 of the non-redundant half spectrum, skipping DC and
/// Nyquist. The first `max_peaks` maxima in scan order are kept, then
/// sorted by descending magnitude.
///
/// # Arguments
/// * `magnitude` - Full magnitude spectrum of length N
/// * `sample_rate` - Sample rate that produced the spectrum
/// * `max_peaks` - Upper bound on returned peaks
/// * `threshold` - Minimum magnitude
pub fn find_peaks_above(
    magnitude: &[f64],
    sample_rate: f64,
    max_peaks: usize,
    threshold: f64,
) -> Vec<Peak> {
    let n = magnitude.len();
    let end = (n / 2).saturating_sub(1);
    let mut peaks = Vec::with_capacity(max_peaks.min(end));

    for i in 1..end {
        if peaks.len() >= max_peaks {
            break;
        }
        let m = magnitude[i];
        if m > magnitude[i - 1] && m > magnitude[i + 1] && m > threshold {
            peaks.push(Peak {
                bin: i,
                frequency: bin_to_frequency(i as f64, n, sample_rate),
                magnitude: m,
            });
        }
    }

    peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    peaks
}

/// Spectrum analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT size (number of samples, must be a power of 2)
    pub fft_size: usize,

    /// Window type for spectral analysis
    pub window_type: WindowType,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Minimum magnitude for peak picking
    pub peak_threshold: f64,

    /// Maximum number of peaks reported per frame
    pub max_peaks: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            window_type: WindowType::Hann,
            sample_rate: 44100.0,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            max_peaks: 10,
        }
    }
}

/// Result of analysing one frame
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    /// Forward spectrum of the windowed frame
    pub spectrum: Vec<Complex<f64>>,

    /// Magnitude of every bin
    pub magnitude: Vec<f64>,

    /// Strongest local maxima, descending magnitude
    pub peaks: Vec<Peak>,
}

/// Frame spectrum analyzer
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    ///
    /// Fails if `config.fft_size` is not a power of two.
    pub fn new(config: AnalyzerConfig) -> Result<Self, FftError> {
        let fft_engine = FftEngine::new(config.fft_size)?;
        Ok(Self { config, fft_engine })
    }

    /// Window, transform and pick peaks
    ///
    /// # Arguments
    /// * `signal` - Time-domain frame (zero-padded to fft_size, longer frames are rejected)
    pub fn analyze(&self, signal: &[f64]) -> Result<SpectrumFrame, FftError> {
        let mut spectrum = self.fft_engine.complex_buffer(signal)?;
        apply_window_inplace(&mut spectrum, self.config.window_type);
        self.fft_engine.forward(&mut spectrum)?;

        let magnitude = magnitude_spectrum(&spectrum);
        let peaks = find_peaks_above(
            &magnitude,
            self.config.sample_rate,
            self.config.max_peaks,
            self.config.peak_threshold,
        );

        Ok(SpectrumFrame {
            spectrum,
            magnitude,
            peaks,
        })
    }

    /// Get frequency of each non-redundant bin in Hz
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        (0..self.fft_engine.num_bins())
            .map(|bin| bin_to_frequency(bin as f64, self.config.fft_size, self.config.sample_rate))
            .collect()
    }

    /// Update configuration
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<(), FftError> {
        if config.fft_size != self.config.fft_size {
            self.fft_engine = FftEngine::new(config.fft_size)?;
        }
        self.config = config;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft_engine.num_bins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: f64, n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_magnitude_spectrum() {
        let spectrum = vec![Complex::new(3.0, 4.0), Complex::new(0.0, -2.0), Complex::new(0.0, 0.0)];
        assert_eq!(magnitude_spectrum(&spectrum), vec![5.0, 2.0, 0.0]);
    }

    #[test]
    fn test_bin_conversions() {
        assert!((bin_to_frequency(10.0, 4096, 44100.0) - 107.666015625).abs() < 1e-9);
        assert!((bin_to_frequency(40.5, 1024, 1024.0) - 40.5).abs() < 1e-12);
        assert_eq!(frequency_to_bin(80.0, 4096, 44100.0), 7);
        assert_eq!(frequency_to_bin(2000.0, 4096, 44100.0), 185);
    }

    #[test]
    fn test_find_peaks_sorted_descending() {
        let mut magnitude = vec![0.0; 64];
        magnitude[3] = 1.0;
        magnitude[10] = 5.0;
        magnitude[17] = 2.5;
        magnitude[25] = 0.05; // below threshold
        magnitude[40] = 9.0; // upper half, ignored

        let peaks = find_peaks(&magnitude, 64.0, 10);

        let bins: Vec<usize> = peaks.iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![10, 17, 3]);
        assert!(peaks.windows(2).all(|w| w[0].magnitude >= w[1].magnitude));
        assert!((peaks[0].frequency - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_peaks_random_spectra_sorted() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let n = 1 << rng.random_range(2..=10u32);
            let magnitude: Vec<f64> = (0..n).map(|_| rng.random::<f64>() * 10.0).collect();
            let max_peaks = rng.random_range(0..=n / 4);

            let peaks = find_peaks(&magnitude, 44100.0, max_peaks);

            assert!(peaks.len() <= max_peaks);
            assert!(peaks.windows(2).all(|w| w[0].magnitude >= w[1].magnitude));
            for peak in &peaks {
                assert!(peak.bin >= 1 && peak.bin + 1 < n / 2);
                assert!(peak.magnitude > DEFAULT_PEAK_THRESHOLD);
            }
        }
    }

    #[test]
    fn test_find_peaks_caps_in_scan_order() {
        let mut magnitude = vec![0.0; 32];
        magnitude[2] = 1.0;
        magnitude[5] = 3.0;
        magnitude[8] = 7.0;

        // Only the first two maxima in scan order are collected
        let peaks = find_peaks(&magnitude, 32.0, 2);
        let bins: Vec<usize> = peaks.iter().map(|p| p.bin).collect();
        assert_eq!(bins, vec![5, 2]);
    }

    #[test]
    fn test_find_peaks_excludes_edges_and_plateaus() {
        let mut magnitude = vec![0.0; 16];
        magnitude[0] = 10.0;
        magnitude[4] = 2.0;
        magnitude[5] = 2.0;
        magnitude[7] = 4.0; // last bin of the scan range is 6

        assert!(find_peaks(&magnitude, 16.0, 10).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 16.0, 10).is_empty());
    }

    #[test]
    fn test_find_peaks_custom_threshold() {
        let mut magnitude = vec![0.0; 32];
        magnitude[4] = 0.05;
        magnitude[9] = 0.5;

        assert_eq!(find_peaks_above(&magnitude, 32.0, 10, 0.01).len(), 2);
        assert_eq!(find_peaks_above(&magnitude, 32.0, 10, 1.0).len(), 0);
    }

    #[test]
    fn test_analyzer_finds_tones() {
        let config = AnalyzerConfig::default();
        let analyzer = SpectrumAnalyzer::new(config).unwrap();

        let signal: Vec<f64> = sine(440.0, 44100.0, 4096, 0.5)
            .iter()
            .zip(sine(659.25, 44100.0, 4096, 0.2))
            .map(|(a, b)| a + b)
            .collect();

        let frame = analyzer.analyze(&signal).unwrap();

        assert_eq!(frame.magnitude.len(), 4096);
        assert!(frame.peaks.len() >= 2);
        assert!((frame.peaks[0].frequency - 440.0).abs() < 11.0);
        assert!((frame.peaks[1].frequency - 659.25).abs() < 11.0);
    }

    #[test]
    fn test_analyzer_rejects_long_frame() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        assert!(matches!(analyzer.analyze(&[0.0; 4097]), Err(FftError::InvalidSize(4097))));
        assert!(analyzer.analyze(&[0.0; 100]).is_ok());
    }

    #[test]
    fn test_analyzer_rejects_bad_size() {
        let config = AnalyzerConfig {
            fft_size: 1000,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(SpectrumAnalyzer::new(config), Err(FftError::InvalidSize(1000))));
    }

    #[test]
    fn test_frequency_axis() {
        let config = AnalyzerConfig {
            fft_size: 1024,
            sample_rate: 48000.0,
            ..AnalyzerConfig::default()
        };
        let mut analyzer = SpectrumAnalyzer::new(config).unwrap();
        let freqs = analyzer.frequency_bins_hz();

        assert_eq!(freqs.len(), 513);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[512] - 24000.0).abs() < 1e-9);

        let resized = AnalyzerConfig {
            fft_size: 2048,
            ..analyzer.config().clone()
        };
        analyzer.update_config(resized).unwrap();
        assert_eq!(analyzer.num_bins(), 1025);
    }
}
