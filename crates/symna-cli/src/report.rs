//! Collected analysis results and their text rendering.

use std::fmt::Write as _;

use serde::Serialize;
use symna::{
    Analysis, Equation, Expr, FrequencyResponse, SimulationConfig, StepResponse, Symbol,
    TransferFunction, frequency_response_with, step_response_with,
};

/// How expressions are rendered in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Plain,
    Latex,
}

impl Notation {
    fn expr(self, expr: &Expr) -> String {
        match self {
            Notation::Plain => expr.to_string(),
            Notation::Latex => expr.to_latex(),
        }
    }

    fn symbol(self, symbol: &Symbol) -> String {
        match self {
            Notation::Plain => symbol.to_string(),
            Notation::Latex => symbol.to_latex(),
        }
    }

    fn equation(self, equation: &Equation) -> String {
        match self {
            Notation::Plain => equation.to_string(),
            Notation::Latex => equation.to_latex(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EquationEntry {
    pub label: String,
    pub equation: String,
}

#[derive(Debug, Serialize)]
pub struct SolutionEntry {
    pub unknown: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct TransferEntry {
    pub input: String,
    pub output: String,
    pub symbolic: String,
    /// Absent when some component has no numeric value.
    pub numeric: Option<TransferFunction>,
}

/// Everything computed for one netlist.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub equations: Vec<EquationEntry>,
    pub solution: Vec<SolutionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bode: Option<FrequencyResponse>,
}

/// What to compute beyond equations and solution.
#[derive(Debug, Clone)]
pub struct Request {
    pub nodes: Option<(String, String)>,
    pub step: bool,
    pub bode: bool,
    pub notation: Notation,
    pub simulation: SimulationConfig,
}

impl Report {
    pub fn collect(analysis: &Analysis, request: &Request) -> symna::Result<Self> {
        let notation = request.notation;
        let equations = analysis
            .equations()?
            .equations()
            .iter()
            .map(|eq| EquationEntry {
                label: eq.label().to_string(),
                equation: notation.equation(eq),
            })
            .collect();
        let solution = analysis
            .solution()?
            .iter()
            .map(|(unknown, value)| SolutionEntry {
                unknown: notation.symbol(unknown),
                value: notation.expr(value),
            })
            .collect();

        let mut report = Report {
            equations,
            solution,
            ..Report::default()
        };
        let Some((input, output)) = &request.nodes else {
            return Ok(report);
        };

        let symbolic = analysis.transfer_function(input, output)?;
        let numeric = match analysis.numeric_transfer_function(input, output) {
            Ok(tf) => Some(tf),
            Err(err) if !(request.step || request.bode) => {
                log::warn!("no numeric transfer function: {err}");
                None
            }
            Err(err) => return Err(err.into()),
        };
        if let Some(tf) = &numeric {
            if request.step {
                report.step = Some(step_response_with(
                    &tf.numerator,
                    &tf.denominator,
                    &request.simulation,
                )?);
            }
            if request.bode {
                report.bode = Some(frequency_response_with(
                    &tf.numerator,
                    &tf.denominator,
                    &request.simulation,
                )?);
            }
        }
        report.transfer = Some(TransferEntry {
            input: input.clone(),
            output: output.clone(),
            symbolic: notation.expr(&symbolic),
            numeric,
        });
        Ok(report)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Equations")?;
        writeln!(out, "=========")?;
        for entry in &self.equations {
            writeln!(out, "{:<32} {}", entry.label, entry.equation)?;
        }
        writeln!(out)?;

        writeln!(out, "Solution")?;
        writeln!(out, "========")?;
        for entry in &self.solution {
            writeln!(out, "{:<12} = {}", entry.unknown, entry.value)?;
        }

        if let Some(transfer) = &self.transfer {
            writeln!(out)?;
            writeln!(
                out,
                "Transfer function V({}) / V({})",
                transfer.output, transfer.input
            )?;
            writeln!(out, "==========================================")?;
            writeln!(out, "H(p) = {}", transfer.symbolic)?;
            match &transfer.numeric {
                Some(tf) => writeln!(out, "H(p) = {tf}")?,
                None => writeln!(out, "(symbolic component values, no numeric form)")?,
            }
        }

        if let Some(step) = &self.step {
            writeln!(out)?;
            writeln!(out, "Step response")?;
            writeln!(out, "{:>14}{:>14}{:>14}", "Time(s)", "Input", "Output")?;
            writeln!(out, "{}", "-".repeat(42))?;
            for ((t, x), y) in step.time.iter().zip(&step.input).zip(&step.output) {
                writeln!(out, "{t:>14.4e}{x:>14.4}{y:>14.6}")?;
            }
        }

        if let Some(bode) = &self.bode {
            writeln!(out)?;
            writeln!(out, "Frequency response")?;
            writeln!(out, "{:>14}{:>14}{:>14}", "w(rad/s)", "Mag(dB)", "Phase(deg)")?;
            writeln!(out, "{}", "-".repeat(42))?;
            for ((w, m), p) in bode
                .frequency
                .iter()
                .zip(&bode.magnitude_db)
                .zip(&bode.phase_deg)
            {
                writeln!(out, "{w:>14.4e}{m:>14.4}{p:>14.4}")?;
            }
        }
        Ok(())
    }
}
