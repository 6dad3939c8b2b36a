//! Energy-ratio gate for frame analysis
//!
//! Compares each frame's energy with the previous frame's. A frame is
//! analysed while energy is rising or holding steady (a note onset or
//! sustain) and skipped while it falls away quickly (a note decaying).

/// Default ratio previous/current energy above which a frame is skipped
pub const DEFAULT_ENERGY_RATIO_THRESHOLD: f64 = 1.5;

/// Frame energy Σ x²
pub fn frame_energy(frame: &[f64]) -> f64 {
    frame.iter().map(|&x| x * x).sum()
}

/// Outcome of gating one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Analyse the frame
    Open { energy_ratio: f64 },

    /// Energy dropped too fast relative to the previous frame
    Decaying { energy_ratio: f64 },

    /// Frame carries no energy
    Silent,
}

impl GateDecision {
    pub fn is_open(&self) -> bool {
        matches!(self, GateDecision::Open { .. })
    }
}

/// Energy-ratio gate
#[derive(Debug, Clone)]
pub struct EnergyGate {
    /// Skip frames whose previous/current energy ratio reaches this
    ratio_threshold: f64,

    /// Energy of the last frame seen
    previous_energy: f64,
}

impl EnergyGate {
    /// Create a new gate
    ///
    /// # Arguments
    /// * `ratio_threshold` - previous/current energy ratio at which frames are skipped
    pub fn new(ratio_threshold: f64) -> Self {
        Self {
            ratio_threshold,
            previous_energy: 0.0,
        }
    }

    /// Gate a frame by its energy and remember the energy for the next call
    pub fn process(&mut self, energy: f64) -> GateDecision {
        let previous = std::mem::replace(&mut self.previous_energy, energy);

        if energy <= 0.0 {
            return GateDecision::Silent;
        }

        let energy_ratio = previous / energy;
        if energy_ratio < self.ratio_threshold {
            GateDecision::Open { energy_ratio }
        } else {
            GateDecision::Decaying { energy_ratio }
        }
    }

    /// Reset gate state
    pub fn reset(&mut self) {
        self.previous_energy = 0.0;
    }

    pub fn ratio_threshold(&self) -> f64 {
        self.ratio_threshold
    }
}

impl Default for EnergyGate {
    fn default() -> Self {
        Self::new(DEFAULT_ENERGY_RATIO_THRESHOLD)
    }
}
