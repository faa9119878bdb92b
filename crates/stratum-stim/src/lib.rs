//! Flat Circuit Text Parser and Emitter for Stratum
//!
//! This crate reads and writes the line-oriented stabilizer circuit text
//! format consumed and produced by the Stratum canonicalizer.
//!
//! # Supported Syntax
//!
//! | Feature | Example |
//! |---------|---------|
//! | Gates | `H 0 1`, `CX 0 1 2 3` |
//! | Arguments | `X_ERROR(0.01) 5`, `DETECTOR(1, 2) rec[-1]` |
//! | Inverted results | `M !3` |
//! | Record lookbacks | `CX rec[-1] 4` |
//! | Sweep bits | `CZ sweep[0] 2` |
//! | Pauli products | `MPP X0*Z1 Y2` |
//! | Repeat blocks | `REPEAT 10 { ... }` |
//! | Comments | `# comment` |
//!
//! Gate names are case-insensitive and aliases (`CNOT`, `ZCZ`, `H_XZ`, ...)
//! resolve to their canonical gate. Names the IR does not know are kept as
//! [`stratum_ir::GateKind::Custom`] instructions.
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use stratum_stim::{emit, parse};
//!
//! let source = "R 0 1\nTICK\ncnot 0 1\nTICK\nM 0 1\nDETECTOR rec[-1] rec[-2]\n";
//!
//! let circuit = parse(source).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//!
//! let emitted = emit(&circuit);
//! assert!(emitted.contains("CX 0 1"));
//! assert_eq!(parse(&emitted).unwrap(), circuit);
//! ```

mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use parser::parse;
