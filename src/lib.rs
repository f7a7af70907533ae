//! Jackal - an interpreter for a Jack-family stack virtual machine
//!
//! # Overview
//!
//! Jackal loads one or more textual VM translation units (`push`/`pop`
//! against segmented memory, 16-bit arithmetic, labelled control flow,
//! function call/return) and executes them on a bounded 16-bit machine:
//! a growable operand stack, a fixed heap, and per-file `static`/`temp`
//! segments. Execution starts in the unit defining `Sys.init` and every
//! failure is reported with the source position of the offending
//! instruction.
//!
//! # Quick Start
//!
//! ```no_run
//! use jackal::{File, MemConsole, Program, Vm};
//!
//! let source = "push constant 7\npush constant 35\nadd\ncall Sys.print_num 1\n";
//! let unit = jackal::parser::parse(source).expect("program should parse");
//!
//! let mut prog = Program::new(vec![File::new(
//!     "demo.vm".to_string(),
//!     source.to_string(),
//!     unit,
//! )]);
//! let mut console = MemConsole::new(b"");
//! Vm::new(&mut prog, &mut console).run().expect("program should run");
//! assert_eq!(console.output_str(), "42");
//! ```
//!
//! The [`Console`] trait is the only seam to the host: swap
//! [`MemConsole`] for [`StdConsole`] to wire the VM's I/O built-ins to
//! the process's standard streams.

use thiserror::Error as ThisError;

// Re-export the core API.
pub use jackal_core::{parser, program, vm};

// Re-export commonly used types.
pub use jackal_core::parser::{Inst, Op, ParseError, ParsedUnit, Segment, Warning};
pub use jackal_core::program::{File, Program, SymKind, SymVal, SymbolTable};
pub use jackal_core::vm::{
    Console, ExecError, ExecErrorKind, Heap, MemConsole, Memory, Stack, StdConsole, Vm, Word,
};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

/// Anything that can go wrong between reading a source file and the end
/// of execution.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Exec(#[from] ExecError),
}
