//! WAV file loading
//!
//! Accepts 16-bit integer PCM, mono, 44100 Hz.

use hound::{SampleFormat, WavReader};
use log::info;
use std::path::Path;
use thiserror::Error;

/// Sample rate the analysis chain is tuned for
pub const EXPECTED_SAMPLE_RATE: u32 = 44100;

#[derive(Error, Debug)]
pub enum WavError {
    #[error("Failed to decode WAV: {0}")]
    Decode(#[from] hound::Error),

    #[error("Sample rate should be 44100 Hz, is {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("Bits per sample should be 16, is {0}")]
    UnsupportedBitDepth(u16),

    #[error("Expected a mono file, found {0} channels")]
    UnsupportedChannels(u16),

    #[error("Only integer PCM is supported")]
    UnsupportedFormat,
}

/// Decoded PCM recording
#[derive(Debug, Clone)]
pub struct Recording {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl Recording {
    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load and validate a WAV file
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Recording, WavError> {
    let reader = WavReader::open(path.as_ref())?;
    let recording = read_recording(reader)?;

    info!(
        "Loaded {}: {} samples ({:.2} s)",
        path.as_ref().display(),
        recording.samples.len(),
        recording.duration_secs()
    );
    Ok(recording)
}

/// Validate the header and decode samples from any reader
pub fn read_recording<R: std::io::Read>(reader: WavReader<R>) -> Result<Recording, WavError> {
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int {
        return Err(WavError::UnsupportedFormat);
    }
    if spec.bits_per_sample != 16 {
        return Err(WavError::UnsupportedBitDepth(spec.bits_per_sample));
    }
    if spec.channels != 1 {
        return Err(WavError::UnsupportedChannels(spec.channels));
    }
    if spec.sample_rate != EXPECTED_SAMPLE_RATE {
        return Err(WavError::UnsupportedSampleRate(spec.sample_rate));
    }

    let samples = reader.into_samples::<i16>().collect::<Result<Vec<_>, _>>()?;

    Ok(Recording {
        sample_rate: spec.sample_rate,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn encode(spec: WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    fn mono_spec(sample_rate: u32) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn test_reads_valid_file() {
        let bytes = encode(mono_spec(44100), &[0, 1000, -1000, i16::MAX]);
        let recording = read_recording(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap();

        assert_eq!(recording.sample_rate, 44100);
        assert_eq!(recording.samples, vec![0, 1000, -1000, i16::MAX]);
    }

    #[test]
    fn test_rejects_sample_rate() {
        let bytes = encode(mono_spec(48000), &[0; 8]);
        let err = read_recording(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap_err();
        assert!(matches!(err, WavError::UnsupportedSampleRate(48000)));
    }

    #[test]
    fn test_rejects_stereo() {
        let spec = WavSpec {
            channels: 2,
            ..mono_spec(44100)
        };
        let bytes = encode(spec, &[0; 8]);
        let err = read_recording(WavReader::new(Cursor::new(bytes)).unwrap()).unwrap_err();
        assert!(matches!(err, WavError::UnsupportedChannels(2)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = WavReader::new(Cursor::new(b"not a wav file".to_vec())).map_err(WavError::from);
        assert!(matches!(err, Err(WavError::Decode(_))));
    }
}
