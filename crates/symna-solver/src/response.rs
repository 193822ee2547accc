//! Step and frequency responses of numeric transfer functions.

use std::f64::consts::PI;

use log::info;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::lti::{StateSpace, polyval, roots};

/// Unit-step response, starting with an explicit `(0, 0, 0)` sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    /// Time points (s).
    pub time: Vec<f64>,
    /// Input trace: the unit step.
    pub input: Vec<f64>,
    /// Output trace.
    pub output: Vec<f64>,
}

impl StepResponse {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Last output sample.
    pub fn final_value(&self) -> Option<f64> {
        self.output.last().copied()
    }
}

/// Bode data over a logarithmic sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyResponse {
    /// Angular frequencies (rad/s).
    pub frequency: Vec<f64>,
    /// Magnitude, `20 log10 |H(jw)|`.
    pub magnitude_db: Vec<f64>,
    /// Unwrapped phase (degrees).
    pub phase_deg: Vec<f64>,
}

impl FrequencyResponse {
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }
}

/// Unit-step response with the default sampling.
pub fn step_response(numerator: &[f64], denominator: &[f64]) -> Result<StepResponse> {
    step_response_with(numerator, denominator, &SimulationConfig::default())
}

/// Unit-step response over `settle_time_constants` of the slowest pole.
pub fn step_response_with(
    numerator: &[f64],
    denominator: &[f64],
    config: &SimulationConfig,
) -> Result<StepResponse> {
    let system = StateSpace::from_transfer_function(numerator, denominator)?;
    if config.step_points == 0 {
        return Err(Error::DegenerateResponse(
            "step response needs at least one sample".to_string(),
        ));
    }

    let slowest = system
        .poles()
        .iter()
        .map(|p| p.re.abs())
        .fold(f64::INFINITY, f64::min);
    let rate = if slowest == 0.0 || !slowest.is_finite() {
        1.0
    } else {
        slowest
    };
    let times = linspace(0.0, config.settle_time_constants / rate, config.step_points);
    let outputs = system.step(&times);
    if let Some(bad) = outputs.iter().position(|y| !y.is_finite()) {
        return Err(Error::DegenerateResponse(format!(
            "step response is not finite at t = {}",
            times[bad]
        )));
    }

    let mut response = StepResponse {
        time: Vec::with_capacity(times.len() + 1),
        input: Vec::with_capacity(times.len() + 1),
        output: Vec::with_capacity(times.len() + 1),
    };
    response.time.push(0.0);
    response.input.push(0.0);
    response.output.push(0.0);
    response.time.extend(times);
    response.input.resize(response.time.len(), 1.0);
    response.output.extend(outputs);

    info!(
        "step response: {} samples up to t = {:.3e} s",
        response.len(),
        response.time.last().copied().unwrap_or_default()
    );
    Ok(response)
}

/// Bode response with the default sampling.
pub fn frequency_response(numerator: &[f64], denominator: &[f64]) -> Result<FrequencyResponse> {
    frequency_response_with(numerator, denominator, &SimulationConfig::default())
}

/// Bode response over a sweep chosen from the poles and zeros.
pub fn frequency_response_with(
    numerator: &[f64],
    denominator: &[f64],
    config: &SimulationConfig,
) -> Result<FrequencyResponse> {
    StateSpace::from_transfer_function(numerator, denominator)?;
    let frequency = generate_frequencies(numerator, denominator, config.frequency_points);

    let mut magnitude_db = Vec::with_capacity(frequency.len());
    let mut phase = Vec::with_capacity(frequency.len());
    for &w in &frequency {
        let s = Complex::new(0.0, w);
        let h = polyval(numerator, s) / polyval(denominator, s);
        let magnitude = 20.0 * h.norm().log10();
        if !magnitude.is_finite() || !h.arg().is_finite() {
            return Err(Error::DegenerateResponse(format!(
                "frequency response is not finite at w = {w}"
            )));
        }
        magnitude_db.push(magnitude);
        phase.push(h.arg());
    }
    let phase_deg = unwrap_phase(&phase)
        .into_iter()
        .map(|p| p * 180.0 / PI)
        .collect();

    info!(
        "frequency response: {} points from {:.3e} to {:.3e} rad/s",
        frequency.len(),
        frequency.first().copied().unwrap_or_default(),
        frequency.last().copied().unwrap_or_default()
    );
    Ok(FrequencyResponse {
        frequency,
        magnitude_db,
        phase_deg,
    })
}

/// Logarithmic sweep covering the dynamics of the system.
///
/// The decade range extends from half a decade below a tenth of the
/// slowest pole or zero to half a decade above three times the fastest
/// one. Only poles and zeros in the closed upper half-plane count, zeros
/// beyond `1e5` are ignored, and singularities at the origin count as 1.
pub fn generate_frequencies(numerator: &[f64], denominator: &[f64], points: usize) -> Vec<f64> {
    let mut poles = roots(denominator);
    if poles.is_empty() {
        poles.push(Complex::new(-1000.0, 0.0));
    }
    let zeros = roots(numerator);

    let mut singular: Vec<Complex<f64>> = poles
        .into_iter()
        .filter(|p| p.im >= 0.0)
        .chain(zeros.into_iter().filter(|z| z.norm() < 1e5 && z.im >= 0.0))
        .collect();
    if singular.is_empty() {
        singular.push(Complex::new(-1000.0, 0.0));
    }

    let shifted = |z: &Complex<f64>| {
        let integrator = if z.norm() < 1e-10 { 1.0 } else { 0.0 };
        (z.re + integrator).abs()
    };
    let high = singular
        .iter()
        .map(|z| 3.0 * shifted(z) + 1.5 * z.im)
        .fold(f64::NEG_INFINITY, f64::max);
    let low = singular
        .iter()
        .map(|z| shifted(z) + 2.0 * z.im)
        .fold(f64::INFINITY, f64::min);

    let high_decade = (high.log10() + 0.5).round_ties_even();
    let low_decade = ((0.1 * low).log10() - 0.5).round_ties_even();
    logspace(low_decade, high_decade, points)
}

/// Remove jumps of more than pi between consecutive phase samples.
fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut unwrapped = Vec::with_capacity(phase.len());
    let mut correction = 0.0;
    for (i, &p) in phase.iter().enumerate() {
        if i > 0 {
            let delta = p - phase[i - 1];
            let mut wrapped = (delta + PI).rem_euclid(2.0 * PI) - PI;
            if wrapped == -PI && delta > 0.0 {
                wrapped = PI;
            }
            if delta.abs() >= PI {
                correction += wrapped - delta;
            }
        }
        unwrapped.push(p + correction);
    }
    unwrapped
}

fn linspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (points - 1) as f64;
            (0..points).map(|i| start + step * i as f64).collect()
        }
    }
}

fn logspace(start_decade: f64, stop_decade: f64, points: usize) -> Vec<f64> {
    linspace(start_decade, stop_decade, points)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}
