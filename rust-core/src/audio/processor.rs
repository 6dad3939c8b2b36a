//! Frame driver
//!
//! Cuts a recording into fixed-size frames, gates them by energy and runs
//! the pitch analyzer on the frames that pass.

use log::{debug, trace, warn};

use crate::audio::gate::{frame_energy, EnergyGate, GateDecision, DEFAULT_ENERGY_RATIO_THRESHOLD};
use crate::pitch::{PitchAnalyzer, PitchConfig, PitchReport};
use crate::spectrum::fft::FftError;

/// Frame driver configuration
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Analysis settings; `fft_size` is also the frame length
    pub pitch: PitchConfig,

    /// Skip frames whose previous/current energy ratio reaches this
    pub energy_ratio_threshold: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            pitch: PitchConfig::default(),
            energy_ratio_threshold: DEFAULT_ENERGY_RATIO_THRESHOLD,
        }
    }
}

/// One analysed frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// 1-based frame number
    pub frame: usize,

    /// Previous/current frame energy
    pub energy_ratio: f64,

    pub pitch: PitchReport,
}

/// Split samples into frames of `frame_size`, zero-padding the last one
pub fn frames(samples: &[i16], frame_size: usize) -> impl Iterator<Item = Vec<f64>> + '_ {
    samples.chunks(frame_size.max(1)).map(move |chunk| {
        let mut frame: Vec<f64> = chunk.iter().map(|&s| s as f64).collect();
        frame.resize(frame_size, 0.0);
        frame
    })
}

/// Energy-gated frame-by-frame pitch analysis
pub struct FrameDriver {
    analyzer: PitchAnalyzer,
    gate: EnergyGate,
}

impl FrameDriver {
    /// Create new frame driver
    ///
    /// Fails if the frame length is not a power of two.
    pub fn new(config: DriverConfig) -> Result<Self, FftError> {
        Ok(Self {
            analyzer: PitchAnalyzer::new(config.pitch)?,
            gate: EnergyGate::new(config.energy_ratio_threshold),
        })
    }

    /// Analyse a whole recording
    ///
    /// Returns reports for the frames the gate let through, in order.
    pub fn process(&mut self, samples: &[i16]) -> Result<Vec<FrameReport>, FftError> {
        self.gate.reset();
        let frame_size = self.analyzer.config().fft_size;

        let mut reports = Vec::new();
        for (index, frame) in frames(samples, frame_size).enumerate() {
            if let Some(report) = self.process_frame(index + 1, &frame)? {
                reports.push(report);
            }
        }
        Ok(reports)
    }

    /// Gate and analyse a single frame
    ///
    /// Frames must arrive in order; the gate compares against the previous one.
    pub fn process_frame(&mut self, number: usize, frame: &[f64]) -> Result<Option<FrameReport>, FftError> {
        let energy = frame_energy(frame);

        match self.gate.process(energy) {
            GateDecision::Open { energy_ratio } => {
                let pitch = self.analyzer.analyze(frame).map_err(|err| {
                    warn!("frame {}: analysis failed: {}", number, err);
                    err
                })?;
                trace!(
                    "frame {}: peak {:.2} Hz, hps {:.2} Hz, autocorr {:.2} Hz",
                    number,
                    pitch.peak,
                    pitch.hps,
                    pitch.autocorrelation
                );
                Ok(Some(FrameReport {
                    frame: number,
                    energy_ratio,
                    pitch,
                }))
            }
            GateDecision::Decaying { energy_ratio } => {
                debug!("frame {}: skipped, energy ratio {:.2}", number, energy_ratio);
                Ok(None)
            }
            GateDecision::Silent => {
                debug!("frame {}: skipped, silent", number);
                Ok(None)
            }
        }
    }

    pub fn analyzer(&self) -> &PitchAnalyzer {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth;
    use crate::pitch::DetectionMethod;

    fn pcm(signal: &[f64], amplitude: f64) -> Vec<i16> {
        signal.iter().map(|&s| (s * amplitude) as i16).collect()
    }

    #[test]
    fn test_frames_pad_last() {
        let samples: Vec<i16> = (1..=10).collect();
        let frames: Vec<Vec<f64>> = frames(&samples, 4).collect();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frames[2], vec![9.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sustained_tone() {
        let mut driver = FrameDriver::new(DriverConfig::default()).unwrap();
        let samples = pcm(&synth::sine(440.0, 44100.0, 4096 * 3, 1.0), 8000.0);

        let reports = driver.process(&samples).unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].frame, 1);
        assert_eq!(reports[0].energy_ratio, 0.0);
        for report in &reports {
            assert_eq!(report.pitch.method, DetectionMethod::Autocorrelation);
            assert!((report.pitch.frequency() - 440.0).abs() < 5.0);
        }
    }

    #[test]
    fn test_decay_and_silence_skipped() {
        let mut driver = FrameDriver::new(DriverConfig::default()).unwrap();

        let loud = pcm(&synth::sine(330.0, 44100.0, 4096, 1.0), 10000.0);
        let quiet = pcm(&synth::sine(330.0, 44100.0, 4096, 1.0), 1000.0);
        let mut samples = loud.clone();
        samples.extend(&quiet);
        samples.extend(vec![0i16; 4096]);
        samples.extend(&loud);

        let reports = driver.process(&samples).unwrap();
        let numbers: Vec<usize> = reports.iter().map(|r| r.frame).collect();

        // Frame 2 decays 100x, frame 3 is silent
        assert_eq!(numbers, vec![1, 4]);
    }

    #[test]
    fn test_oversized_frame_fails() {
        let mut driver = FrameDriver::new(DriverConfig::default()).unwrap();
        let frame = synth::sine(440.0, 44100.0, 5000, 1000.0);

        let result = driver.process_frame(1, &frame);
        assert!(matches!(result, Err(FftError::InvalidSize(5000))));
    }

    #[test]
    fn test_rejects_bad_frame_size() {
        let mut config = DriverConfig::default();
        config.pitch.fft_size = 1000;
        assert!(FrameDriver::new(config).is_err());
    }
}
