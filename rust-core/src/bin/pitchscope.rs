//! Command-line pitch analysis
//!
//! `pitchscope wav <file>` runs the energy-gated frame analysis over a
//! recording; `pitchscope demo` analyses synthetic test tones.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use pitchscope::audio::{load_wav, synth, DriverConfig, FrameDriver};
use pitchscope::pitch::{DetectionMethod, PitchAnalyzer, PitchConfig, PitchReport};
use pitchscope::spectrum::display::{render_spectrum, DEFAULT_DISPLAY_BINS};
use pitchscope::spectrum::{AnalyzerConfig, SpectrumAnalyzer, WindowType};

#[derive(Parser)]
#[command(name = "pitchscope", about = "FFT spectrum and pitch analysis", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a 16-bit mono 44.1 kHz WAV file frame by frame
    Wav {
        /// Path to the WAV file
        path: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Skip frames whose previous/current energy ratio reaches this
        #[arg(long, default_value_t = 1.5)]
        energy_ratio: f64,
    },

    /// Analyse synthetic test tones
    Demo {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Print the spectrum of the mixed test tone
        #[arg(long)]
        spectrum: bool,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// Estimate reported for each frame
    #[arg(long, value_enum, default_value_t = MethodArg::Autocorrelation)]
    method: MethodArg,

    /// Window applied before the spectral methods
    #[arg(long, value_enum, default_value_t = WindowArg::Hann)]
    window: WindowArg,

    /// Frame length, must be a power of two
    #[arg(long, default_value_t = 4096)]
    fft_size: usize,

    /// Harmonics used by the HPS method
    #[arg(long, default_value_t = 3)]
    harmonics: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Peak,
    Hps,
    Autocorrelation,
}

impl From<MethodArg> for DetectionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Peak => DetectionMethod::Peak,
            MethodArg::Hps => DetectionMethod::Hps,
            MethodArg::Autocorrelation => DetectionMethod::Autocorrelation,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum WindowArg {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<WindowArg> for WindowType {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Hann => WindowType::Hann,
            WindowArg::Hamming => WindowType::Hamming,
            WindowArg::Blackman => WindowType::Blackman,
            WindowArg::Rectangular => WindowType::Rectangular,
        }
    }
}

impl AnalysisArgs {
    fn pitch_config(&self, sample_rate: f64) -> PitchConfig {
        PitchConfig {
            fft_size: self.fft_size,
            sample_rate,
            window_type: self.window.into(),
            hps_harmonics: self.harmonics,
            method: self.method.into(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Wav {
            path,
            analysis,
            energy_ratio,
        } => run_wav(&path, &analysis, energy_ratio),
        Command::Demo { analysis, spectrum } => run_demo(&analysis, spectrum),
    }
}

fn print_report(report: &PitchReport) {
    let frequency = report.frequency();
    println!("Method: {}", report.method);
    println!("Detected pitch: {:.2} Hz", frequency);
    match report.note() {
        Some(note) => println!("Musical note: {}", note),
        None => println!("Musical note: -"),
    }
    println!("Confidence: {:.1}%", report.confidence * 100.0);
}

fn run_wav(path: &Path, analysis: &AnalysisArgs, energy_ratio: f64) -> Result<()> {
    let recording = load_wav(path).with_context(|| format!("Failed to load {}", path.display()))?;
    println!("Wav file loaded successfully ({} samples)", recording.samples.len());

    let config = DriverConfig {
        pitch: analysis.pitch_config(recording.sample_rate as f64),
        energy_ratio_threshold: energy_ratio,
    };
    let mut driver = FrameDriver::new(config).context("Invalid analysis settings")?;
    let reports = driver.process(&recording.samples)?;
    info!("{} frames analysed", reports.len());

    for frame in &reports {
        println!("Frame: {}", frame.frame);
        println!("Energy ratio: {:.2}", frame.energy_ratio);
        print_report(&frame.pitch);
        println!();
    }

    Ok(())
}

fn run_demo(analysis: &AnalysisArgs, show_spectrum: bool) -> Result<()> {
    const SAMPLE_RATE: f64 = 44100.0;
    let n = analysis.fft_size;
    let analyzer = PitchAnalyzer::new(analysis.pitch_config(SAMPLE_RATE)).context("Invalid analysis settings")?;
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut noisy = synth::sine(440.0, SAMPLE_RATE, n, 1.0);
    synth::add_uniform_noise(&mut noisy, 0.2, &mut rng);

    let cases: Vec<(&str, Vec<f64>)> = vec![
        ("Pure sine wave (A4 = 440 Hz)", synth::sine(440.0, SAMPLE_RATE, n, 1.0)),
        (
            "Complex tone (E4 with harmonics)",
            synth::musical_note(329.63, SAMPLE_RATE, n, Some(&[1.0, 0.5, 0.3, 0.2, 0.1])),
        ),
        ("C major chord (C4, E4, G4)", synth::chord(&[261.63, 329.63, 392.0], SAMPLE_RATE, n)),
        ("Noisy signal (A4 with 20% noise)", noisy),
    ];

    for (title, signal) in &cases {
        println!("{}", title);
        println!("{}", "-".repeat(title.chars().count()));
        print_report(&analyzer.analyze(signal)?);
        println!();
    }

    println!("Method comparison (true frequency 220.00 Hz)");
    println!("============================================");
    let report = analyzer.analyze(&synth::musical_note(220.0, SAMPLE_RATE, n, Some(&[1.0, 0.5, 1.0 / 3.0])))?;
    for method in DetectionMethod::ALL {
        let estimate = report.estimate(method);
        println!("{:>16}: {:8.2} Hz (error: {:+.2} Hz)", method.label(), estimate, estimate - 220.0);
    }

    let spectrum_config = AnalyzerConfig {
        fft_size: n,
        window_type: analysis.window.into(),
        sample_rate: SAMPLE_RATE,
        ..AnalyzerConfig::default()
    };
    let spectrum_analyzer = SpectrumAnalyzer::new(spectrum_config)?;
    let mut mix = synth::sine(440.0, SAMPLE_RATE, n, 0.5);
    for (s, (a, b)) in mix.iter_mut().zip(
        synth::sine(554.37, SAMPLE_RATE, n, 0.3)
            .into_iter()
            .zip(synth::sine(659.25, SAMPLE_RATE, n, 0.2)),
    ) {
        *s += a + b;
    }
    synth::add_uniform_noise(&mut mix, 0.1, &mut rng);
    let frame = spectrum_analyzer.analyze(&mix)?;

    println!();
    println!("Detected peaks (A4 + C#5 + E5)");
    println!("==============================");
    for (i, peak) in frame.peaks.iter().take(5).enumerate() {
        println!("{}. {:.1} Hz (magnitude: {:.3})", i + 1, peak.frequency, peak.magnitude);
    }

    if show_spectrum {
        println!();
        print!("{}", render_spectrum(&frame.magnitude, SAMPLE_RATE, DEFAULT_DISPLAY_BINS));
    }

    Ok(())
}
