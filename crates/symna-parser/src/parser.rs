//! Netlist parser.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};
use symna_core::units::parse_value;
use symna_core::{Component, ComponentKind, NodeId};

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};

/// Components and nodes read from a netlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Components in netlist order.
    pub components: Vec<Component>,
    /// Distinct node ids referenced by the components, sorted.
    pub nodes: Vec<NodeId>,
}

impl ParseResult {
    pub fn into_parts(self) -> (Vec<Component>, Vec<NodeId>) {
        (self.components, self.nodes)
    }
}

/// Parse a netlist string.
pub fn parse(input: &str) -> Result<ParseResult> {
    Parser::new(input).parse()
}

/// One component line: its words and where it came from.
struct Line<'a> {
    number: usize,
    text: &'a str,
    words: Vec<String>,
}

struct Parser<'a> {
    input: &'a str,
    components: Vec<Component>,
    /// Source line of each parsed component.
    lines: Vec<(usize, &'a str)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            components: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<ParseResult> {
        for line in self.component_lines() {
            let component = self.parse_component(&line)?;
            self.check_duplicates(&component, &line)?;
            debug!("line {}: {}", line.number, component);
            self.components.push(component);
            self.lines.push((line.number, line.text));
        }
        self.check_series_current_sources()?;

        let nodes: BTreeSet<NodeId> = self
            .components
            .iter()
            .flat_map(|c| c.nodes().iter().cloned())
            .collect();
        info!(
            "parsed {} components on {} nodes",
            self.components.len(),
            nodes.len()
        );
        Ok(ParseResult {
            components: self.components,
            nodes: nodes.into_iter().collect(),
        })
    }

    /// Group the token stream into component lines, skipping directives.
    fn component_lines(&self) -> Vec<Line<'a>> {
        let source: Vec<&'a str> = self.input.lines().collect();
        let mut lines = Vec::new();
        let mut current: Option<Line<'a>> = None;

        for spanned in Lexer::new(self.input).tokenize() {
            match spanned.token {
                Token::Word(word) => current
                    .get_or_insert_with(|| Line {
                        number: spanned.line,
                        text: source.get(spanned.line - 1).copied().map_or("", str::trim),
                        words: Vec::new(),
                    })
                    .words
                    .push(word),
                Token::Directive(name) if name == "END" => {}
                Token::Directive(name) => {
                    warn!("line {}: skipping directive .{}", spanned.line, name.to_lowercase());
                }
                Token::Eol | Token::Eof => lines.extend(current.take()),
            }
        }
        lines
    }

    fn parse_component(&self, line: &Line<'_>) -> Result<Component> {
        let name = &line.words[0];
        let kind = name
            .chars()
            .next()
            .and_then(ComponentKind::from_prefix)
            .ok_or_else(|| Error::UnknownKind {
                line: line.number,
                text: line.text.to_string(),
            })?;

        let terminals = kind.terminal_count();
        if line.words.len() < 1 + terminals {
            return Err(malformed(
                line,
                format!("{kind} needs {terminals} nodes"),
            ));
        }
        let nodes = line.words[1..=terminals]
            .iter()
            .map(|w| NodeId::new(w.as_str()))
            .collect();
        let rest = &line.words[1 + terminals..];

        let value = match kind {
            ComponentKind::VoltageSource => voltage_value(line, rest)?,
            ComponentKind::Opamp | ComponentKind::Wire => {
                if !rest.is_empty() {
                    warn!("line {}: ignoring trailing tokens after {name}", line.number);
                }
                None
            }
            _ => {
                let token = rest
                    .first()
                    .ok_or_else(|| malformed(line, format!("{kind} needs a value")))?;
                value_token(line, token)?
            }
        };

        Ok(Component::new(kind, name.as_str(), nodes, value)?)
    }

    fn check_duplicates(&self, component: &Component, line: &Line<'_>) -> Result<()> {
        if self.components.iter().any(|c| c.name() == component.name()) {
            return Err(Error::DuplicateName {
                line: line.number,
                name: component.name().to_string(),
            });
        }
        if component.kind() != ComponentKind::VoltageSource {
            return Ok(());
        }
        let pair = unordered(component.nodes());
        if let Some(existing) = self
            .components
            .iter()
            .filter(|c| c.kind() == ComponentKind::VoltageSource)
            .find(|c| unordered(c.nodes()) == pair)
        {
            return Err(Error::DuplicateVoltageSource {
                line: line.number,
                text: line.text.to_string(),
                name: component.name().to_string(),
                existing: existing.name().to_string(),
            });
        }
        Ok(())
    }

    /// Reject current sources meeting at a node nothing else touches.
    fn check_series_current_sources(&self) -> Result<()> {
        let mut touching: HashMap<&NodeId, Vec<usize>> = HashMap::new();
        for (index, component) in self.components.iter().enumerate() {
            for node in component.nodes() {
                let entry = touching.entry(node).or_default();
                if !entry.contains(&index) {
                    entry.push(index);
                }
            }
        }

        for (index, component) in self.components.iter().enumerate() {
            if component.kind() != ComponentKind::CurrentSource {
                continue;
            }
            for node in component.nodes().iter().filter(|n| !n.is_ground()) {
                let Some(&[first, second]) = touching.get(node).map(Vec::as_slice) else {
                    continue;
                };
                let other = if first == index { second } else { first };
                if other < index
                    && self.components[other].kind() == ComponentKind::CurrentSource
                {
                    let (line, text) = self.lines[index];
                    return Err(Error::SeriesCurrentSources {
                        line,
                        text: text.to_string(),
                        name: component.name().to_string(),
                        existing: self.components[other].name().to_string(),
                        node: node.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Value of a voltage source: the token after `DC`, or a bare value.
fn voltage_value(line: &Line<'_>, rest: &[String]) -> Result<Option<f64>> {
    if rest.iter().any(|w| w.eq_ignore_ascii_case("AC")) {
        return Err(Error::UnsupportedAcSource {
            line: line.number,
            text: line.text.to_string(),
        });
    }
    if let Some(position) = rest.iter().position(|w| w.eq_ignore_ascii_case("DC")) {
        let token = rest
            .get(position + 1)
            .ok_or_else(|| malformed(line, "DC needs a value".to_string()))?;
        return value_token(line, token);
    }
    match rest.first() {
        Some(token) => {
            warn!(
                "line {}: voltage source value without DC, reading `{token}`",
                line.number
            );
            value_token(line, token)
        }
        None => {
            debug!("line {}: voltage source left symbolic", line.number);
            Ok(None)
        }
    }
}

/// `SYMBOLIC` leaves a component without a numeric value.
fn value_token(line: &Line<'_>, token: &str) -> Result<Option<f64>> {
    if token.eq_ignore_ascii_case("SYMBOLIC") {
        return Ok(None);
    }
    parse_value(token).map(Some).ok_or_else(|| Error::InvalidValue {
        line: line.number,
        text: line.text.to_string(),
        value: token.to_string(),
    })
}

fn malformed(line: &Line<'_>, message: String) -> Error {
    Error::Malformed {
        line: line.number,
        text: line.text.to_string(),
        message,
    }
}

fn unordered(nodes: &[NodeId]) -> (&NodeId, &NodeId) {
    if nodes[0] <= nodes[1] {
        (&nodes[0], &nodes[1])
    } else {
        (&nodes[1], &nodes[0])
    }
}
