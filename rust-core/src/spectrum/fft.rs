//! In-place radix-2 FFT engine
//!
//! Iterative Cooley-Tukey decimation-in-time transform over complex buffers,
//! used both forward and inverse.

use num_complex::Complex;
use std::f64::consts::PI;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FftError {
    #[error("FFT length must be a non-zero power of two (got {0})")]
    InvalidSize(usize),
}

/// Transform direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// X[k] = Σ x[n]·exp(-2πi·kn/N)
    Forward,

    /// x[n] = (1/N)·Σ X[k]·exp(+2πi·kn/N)
    Inverse,
}

impl Direction {
    /// Sign of the twiddle exponent
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }
}

/// Reverse the lowest `bits` bits of `index`
fn bit_reverse(mut index: usize, bits: u32) -> usize {
    let mut reversed = 0;
    for _ in 0..bits {
        reversed = (reversed << 1) | (index & 1);
        index >>= 1;
    }
    reversed
}

/// Transform a buffer in place
///
/// # Arguments
/// * `buffer` - Complex samples, length must be a power of two
/// * `direction` - Forward, or inverse (scaled by 1/N)
///
/// # Errors
/// `FftError::InvalidSize` if the length is zero or not a power of two.
/// The buffer is left untouched in that case.
pub fn transform(buffer: &mut [Complex<f64>], direction: Direction) -> Result<(), FftError> {
    let n = buffer.len();
    if !n.is_power_of_two() {
        return Err(FftError::InvalidSize(n));
    }

    let bits = n.trailing_zeros();

    // Bit-reversal permutation, each pair swapped once
    for i in 0..n {
        let j = bit_reverse(i, bits);
        if i < j {
            buffer.swap(i, j);
        }
    }

    // Butterfly stages: sub-transform size m = 2^s
    for stage in 1..=bits {
        let m = 1usize << stage;
        let half = m >> 1;
        let w_m = Complex::from_polar(1.0, direction.sign() * 2.0 * PI / m as f64);

        for k in (0..n).step_by(m) {
            let mut w = Complex::new(1.0, 0.0);
            for j in 0..half {
                let top = k + j;
                let bot = top + half;

                let t = w * buffer[bot];
                let u = buffer[top];
                buffer[top] = u + t;
                buffer[bot] = u - t;

                w *= w_m;
            }
        }
    }

    if direction == Direction::Inverse {
        let scale = 1.0 / n as f64;
        for x in buffer.iter_mut() {
            *x *= scale;
        }
    }

    Ok(())
}

/// FFT engine bound to a fixed transform size
///
/// Validates the size once at construction so per-frame calls only
/// check that the buffer matches.
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (must be a power of two)
    pub fn new(fft_size: usize) -> Result<Self, FftError> {
        if !fft_size.is_power_of_two() {
            return Err(FftError::InvalidSize(fft_size));
        }
        Ok(Self { fft_size })
    }

    /// Forward transform in place
    pub fn forward(&self, buffer: &mut [Complex<f64>]) -> Result<(), FftError> {
        self.check_len(buffer)?;
        transform(buffer, Direction::Forward)
    }

    /// Inverse transform in place (scaled by 1/N)
    pub fn inverse(&self, buffer: &mut [Complex<f64>]) -> Result<(), FftError> {
        self.check_len(buffer)?;
        transform(buffer, Direction::Inverse)
    }

    /// Promote a real signal to a complex buffer of `fft_size` samples
    ///
    /// Shorter signals are zero-padded. Longer ones are rejected with
    /// `FftError::InvalidSize`.
    pub fn complex_buffer(&self, signal: &[f64]) -> Result<Vec<Complex<f64>>, FftError> {
        if signal.len() > self.fft_size {
            return Err(FftError::InvalidSize(signal.len()));
        }
        let mut buffer = vec![Complex::new(0.0, 0.0); self.fft_size];
        for (dst, &src) in buffer.iter_mut().zip(signal.iter()) {
            dst.re = src;
        }
        Ok(buffer)
    }

    fn check_len(&self, buffer: &[Complex<f64>]) -> Result<(), FftError> {
        if buffer.len() != self.fft_size {
            return Err(FftError::InvalidSize(buffer.len()));
        }
        Ok(())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of non-redundant bins (fft_size/2 + 1)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rustfft::FftPlanner;

    fn test_signal(n: usize) -> Vec<Complex<f64>> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                Complex::new((0.3 * t).sin() + 0.25 * (1.7 * t).cos(), (0.11 * t).cos() * 0.5)
            })
            .collect()
    }

    fn max_error(a: &[Complex<f64>], b: &[Complex<f64>]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_bit_reverse() {
        assert_eq!(bit_reverse(0b001, 3), 0b100);
        assert_eq!(bit_reverse(0b110, 3), 0b011);
        assert_eq!(bit_reverse(5, 0), 0);
    }

    #[test]
    fn test_round_trip() {
        for k in 1..=12 {
            let n = 1 << k;
            let original = test_signal(n);
            let mut buffer = original.clone();

            transform(&mut buffer, Direction::Forward).unwrap();
            transform(&mut buffer, Direction::Inverse).unwrap();

            assert!(max_error(&buffer, &original) < 1e-9, "round trip failed for N={}", n);
        }
    }

    #[test]
    fn test_matches_rustfft() {
        let n = 1024;
        let mut ours = test_signal(n);
        let mut reference = ours.clone();

        transform(&mut ours, Direction::Forward).unwrap();
        FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut reference);

        assert!(max_error(&ours, &reference) < 1e-8);
    }

    #[test]
    fn test_linearity() {
        let n = 256;
        let x = test_signal(n);
        let y: Vec<Complex<f64>> = (0..n).map(|i| Complex::new((i % 7) as f64, -(i as f64) * 0.01)).collect();
        let a = Complex::new(2.0, -0.5);
        let b = Complex::new(-1.25, 0.0);

        let mut combined: Vec<Complex<f64>> = x.iter().zip(y.iter()).map(|(&xi, &yi)| a * xi + b * yi).collect();
        let mut fx = x.clone();
        let mut fy = y.clone();
        transform(&mut combined, Direction::Forward).unwrap();
        transform(&mut fx, Direction::Forward).unwrap();
        transform(&mut fy, Direction::Forward).unwrap();

        let expected: Vec<Complex<f64>> = fx.iter().zip(fy.iter()).map(|(&p, &q)| a * p + b * q).collect();
        assert!(max_error(&combined, &expected) < 1e-9);
    }

    #[test]
    fn test_cosine_at_bin() {
        let n = 64;
        let k = 5;
        let mut buffer: Vec<Complex<f64>> = (0..n)
            .map(|i| Complex::new((2.0 * PI * k as f64 * i as f64 / n as f64).cos(), 0.0))
            .collect();

        transform(&mut buffer, Direction::Forward).unwrap();

        for (bin, value) in buffer.iter().enumerate() {
            if bin == k || bin == n - k {
                assert_abs_diff_eq!(value.norm(), n as f64 / 2.0, epsilon = 1e-9);
            } else {
                assert_abs_diff_eq!(value.norm(), 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut buffer = vec![Complex::new(0.0, 0.0); 16];
        buffer[0] = Complex::new(1.0, 0.0);

        transform(&mut buffer, Direction::Forward).unwrap();

        assert!(buffer.iter().all(|c| (c - Complex::new(1.0, 0.0)).norm() < 1e-12));
    }

    #[test]
    fn test_invalid_size() {
        let mut buffer = vec![Complex::new(1.0, 0.0); 100];
        let before = buffer.clone();

        assert_eq!(transform(&mut buffer, Direction::Forward), Err(FftError::InvalidSize(100)));
        assert_eq!(buffer, before);

        let mut empty: Vec<Complex<f64>> = Vec::new();
        assert_eq!(transform(&mut empty, Direction::Inverse), Err(FftError::InvalidSize(0)));
    }

    #[test]
    fn test_single_sample() {
        let mut buffer = vec![Complex::new(3.0, -2.0)];
        transform(&mut buffer, Direction::Forward).unwrap();
        assert_eq!(buffer[0], Complex::new(3.0, -2.0));
    }

    #[test]
    fn test_engine_checks_length() {
        assert!(FftEngine::new(1000).is_err());

        let engine = FftEngine::new(8).unwrap();
        let mut wrong = vec![Complex::new(0.0, 0.0); 16];
        assert_eq!(engine.forward(&mut wrong), Err(FftError::InvalidSize(16)));

        let buffer = engine.complex_buffer(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer[2], Complex::new(3.0, 0.0));
        assert_eq!(buffer[7], Complex::new(0.0, 0.0));
        assert_eq!(engine.num_bins(), 5);
    }

    #[test]
    fn test_complex_buffer_rejects_long_signal() {
        let engine = FftEngine::new(8).unwrap();
        assert_eq!(engine.complex_buffer(&[0.5; 8]).unwrap().len(), 8);
        assert_eq!(engine.complex_buffer(&[0.5; 9]), Err(FftError::InvalidSize(9)));
    }
}
