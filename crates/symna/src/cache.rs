//! Artifact cache keyed by circuit id.
//!
//! Each stored circuit keeps its netlist text, a lazily built [`Analysis`]
//! and, per (input, output) node pair, the transfer function and the
//! responses derived from it. Changing a circuit's netlist discards
//! everything computed for it.

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::{debug, info};
use symna_algebra::Expr;
use symna_solver::{
    Analysis, EquationSystem, FrequencyResponse, SimulationConfig, SolverConfig, StepResponse,
    SymbolicSolution, TransferFunction, frequency_response_with, numeric_transfer_function,
    step_response_with,
};

use crate::build;
use crate::error::{Error, Result};

type NodePair = (String, String);

#[derive(Debug)]
struct NumericArtifacts {
    transfer: TransferFunction,
    step: Option<StepResponse>,
    bode: Option<FrequencyResponse>,
}

impl NumericArtifacts {
    fn new(transfer: TransferFunction) -> Self {
        Self {
            transfer,
            step: None,
            bode: None,
        }
    }
}

#[derive(Debug)]
struct TransferArtifacts {
    symbolic: Expr,
    numeric: Option<NumericArtifacts>,
}

#[derive(Debug)]
struct CircuitEntry {
    netlist: String,
    analysis: Option<Analysis>,
    transfers: IndexMap<NodePair, TransferArtifacts>,
}

impl CircuitEntry {
    fn new(netlist: String) -> Self {
        Self {
            netlist,
            analysis: None,
            transfers: IndexMap::new(),
        }
    }
}

fn load<'a>(
    slot: &'a mut Option<Analysis>,
    netlist: &str,
    config: SolverConfig,
) -> Result<&'a Analysis> {
    let analysis = match slot.take() {
        Some(analysis) => analysis,
        None => {
            debug!("building analysis from {} bytes of netlist", netlist.len());
            build(netlist, config)?
        }
    };
    Ok(slot.insert(analysis))
}

fn transfer<'a>(
    entry: &'a mut CircuitEntry,
    input: &str,
    output: &str,
    config: SolverConfig,
) -> Result<&'a mut TransferArtifacts> {
    let CircuitEntry {
        netlist,
        analysis,
        transfers,
    } = entry;
    match transfers.entry((input.to_string(), output.to_string())) {
        Entry::Occupied(slot) => Ok(slot.into_mut()),
        Entry::Vacant(slot) => {
            let symbolic = load(analysis, netlist, config)?.transfer_function(input, output)?;
            Ok(slot.insert(TransferArtifacts {
                symbolic,
                numeric: None,
            }))
        }
    }
}

fn numeric<'a>(
    entry: &'a mut CircuitEntry,
    input: &str,
    output: &str,
    config: SolverConfig,
) -> Result<&'a mut NumericArtifacts> {
    let values = load(&mut entry.analysis, &entry.netlist, config)?.parameter_values();
    let artifacts = transfer(entry, input, output, config)?;
    let numeric = match artifacts.numeric.take() {
        Some(numeric) => numeric,
        None => NumericArtifacts::new(numeric_transfer_function(&artifacts.symbolic, &values)?),
    };
    Ok(artifacts.numeric.insert(numeric))
}

/// Per-circuit store of analyses and derived artifacts.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    solver: SolverConfig,
    simulation: SimulationConfig,
    entries: IndexMap<String, CircuitEntry>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(solver: SolverConfig, simulation: SimulationConfig) -> Self {
        Self {
            solver,
            simulation,
            entries: IndexMap::new(),
        }
    }

    /// Store `netlist` under `id`.
    ///
    /// Returns true when previously cached results were discarded, which
    /// happens only if the id existed with different netlist text.
    pub fn set_netlist(&mut self, id: impl Into<String>, netlist: impl Into<String>) -> bool {
        let id = id.into();
        let netlist = netlist.into();
        match self.entries.entry(id) {
            Entry::Occupied(mut slot) => {
                if slot.get().netlist == netlist {
                    return false;
                }
                info!("netlist of circuit {} changed, invalidating", slot.key());
                *slot.get_mut() = CircuitEntry::new(netlist);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(CircuitEntry::new(netlist));
                false
            }
        }
    }

    /// Drop a circuit and all its artifacts.
    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.shift_remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn netlist(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|entry| entry.netlist.as_str())
    }

    /// Stored ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the circuit's symbolic system has been solved.
    pub fn is_solved(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .and_then(|entry| entry.analysis.as_ref())
            .is_some_and(Analysis::is_solved)
    }

    /// True when a transfer function for the node pair is cached.
    pub fn has_transfer(&self, id: &str, input: &str, output: &str) -> bool {
        self.entries.get(id).is_some_and(|entry| {
            entry
                .transfers
                .contains_key(&(input.to_string(), output.to_string()))
        })
    }

    fn entry(&mut self, id: &str) -> Result<&mut CircuitEntry> {
        self.entries.get_mut(id).ok_or_else(|| Error::UnknownCircuit {
            id: id.to_string(),
        })
    }

    pub fn analysis(&mut self, id: &str) -> Result<&Analysis> {
        let config = self.solver;
        let entry = self.entry(id)?;
        load(&mut entry.analysis, &entry.netlist, config)
    }

    pub fn equations(&mut self, id: &str) -> Result<&EquationSystem> {
        Ok(self.analysis(id)?.equations()?)
    }

    pub fn solution(&mut self, id: &str) -> Result<&SymbolicSolution> {
        Ok(self.analysis(id)?.solution()?)
    }

    pub fn transfer_function(&mut self, id: &str, input: &str, output: &str) -> Result<&Expr> {
        let config = self.solver;
        let artifacts = transfer(self.entry(id)?, input, output, config)?;
        Ok(&artifacts.symbolic)
    }

    pub fn numeric_transfer_function(
        &mut self,
        id: &str,
        input: &str,
        output: &str,
    ) -> Result<&TransferFunction> {
        let config = self.solver;
        let numeric = numeric(self.entry(id)?, input, output, config)?;
        Ok(&numeric.transfer)
    }

    pub fn step_response(&mut self, id: &str, input: &str, output: &str) -> Result<&StepResponse> {
        let config = self.solver;
        let simulation = self.simulation;
        let numeric = numeric(self.entry(id)?, input, output, config)?;
        let step = match numeric.step.take() {
            Some(step) => step,
            None => step_response_with(
                &numeric.transfer.numerator,
                &numeric.transfer.denominator,
                &simulation,
            )?,
        };
        Ok(numeric.step.insert(step))
    }

    pub fn frequency_response(
        &mut self,
        id: &str,
        input: &str,
        output: &str,
    ) -> Result<&FrequencyResponse> {
        let config = self.solver;
        let simulation = self.simulation;
        let numeric = numeric(self.entry(id)?, input, output, config)?;
        let bode = match numeric.bode.take() {
            Some(bode) => bode,
            None => frequency_response_with(
                &numeric.transfer.numerator,
                &numeric.transfer.denominator,
                &simulation,
            )?,
        };
        Ok(numeric.bode.insert(bode))
    }
}
