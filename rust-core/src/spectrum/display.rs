//! Text rendering of magnitude spectra

use std::fmt::Write;

use super::analysis::bin_to_frequency;

/// Default number of bins drawn
pub const DEFAULT_DISPLAY_BINS: usize = 64;

/// Width in characters of the longest bar
const BAR_WIDTH: f64 = 50.0;

/// Render the low end of a magnitude spectrum as a bar chart
///
/// Draws the first `min(display_bins, N/2)` bins, one line each, with bars
/// scaled to the largest magnitude among the drawn bins.
///
/// # Arguments
/// * `magnitude` - Full magnitude spectrum of length N
/// * `sample_rate` - Sample rate that produced the spectrum
/// * `display_bins` - Number of bins to draw
pub fn render_spectrum(magnitude: &[f64], sample_rate: f64, display_bins: usize) -> String {
    let n = magnitude.len();
    let shown = display_bins.min(n / 2);
    let max_mag = magnitude[..shown].iter().cloned().fold(0.0, f64::max);

    let mut out = String::new();
    out.push_str("Frequency Spectrum:\n");
    out.push_str("==================\n");

    for (bin, &mag) in magnitude[..shown].iter().enumerate() {
        let freq = bin_to_frequency(bin as f64, n, sample_rate);
        let bar_len = if max_mag > 0.0 {
            (BAR_WIDTH * mag / max_mag) as usize
        } else {
            0
        };
        let _ = writeln!(out, "{:5.0} Hz |{} {:.3}", freq, "█".repeat(bar_len), mag);
    }

    out
}
