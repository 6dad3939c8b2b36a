//! Audio sources and the frame-by-frame analysis loop

pub mod gate;
pub mod processor;
pub mod synth;
pub mod wav;

pub use gate::{frame_energy, EnergyGate, GateDecision};
pub use processor::{DriverConfig, FrameDriver, FrameReport};
pub use wav::{load_wav, Recording, WavError};
