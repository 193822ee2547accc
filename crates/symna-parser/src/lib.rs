//! Netlist parser for symna.
//!
//! Reads one component per line: a name whose first letter selects the kind
//! (`R`, `L`, `C`, `V`, `I`, `O`), its nodes, and a value. Voltage sources
//! take their value after `DC`; `SYMBOLIC` leaves a value free. Lines
//! starting with `*` or `.` are skipped.
//!
//! ```
//! use symna_parser::parse;
//!
//! let result = parse("V1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k").unwrap();
//! assert_eq!(result.components.len(), 3);
//! assert_eq!(result.nodes.len(), 3);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{Error, Result};
pub use parser::{ParseResult, parse};
