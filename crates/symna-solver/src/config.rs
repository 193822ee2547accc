//! Solver and simulation parameters.

use serde::{Deserialize, Serialize};

/// Options for equation assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Treat current-source values as known and add `i_I = I` for each
    /// current source. Off by default, which leaves the branch current of
    /// every current source free.
    pub pin_current_sources: bool,
}

/// Sampling of the automatically chosen step and frequency grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Samples of the step response, before the prepended origin.
    pub step_points: usize,
    /// Simulated duration in units of the slowest time constant.
    pub settle_time_constants: f64,
    /// Samples of the frequency sweep.
    pub frequency_points: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_points: 100,
            settle_time_constants: 7.0,
            frequency_points: 100,
        }
    }
}
