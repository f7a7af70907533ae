//! Execution errors.
//!
//! Every failure is fatal to the run: handlers restore whatever state they
//! already mutated, then the error propagates straight out of the dispatch
//! loop. Each error carries the failing instruction's position and a copy
//! of its file's source text so it can be rendered with context after the
//! program value is gone.

use std::fmt;

use crate::parser::Pos;
use crate::program::SymKind;
use crate::vm::word::{BIT16_LIMIT, Word, Wordbuf};

#[derive(Debug, Clone, PartialEq)]
pub enum ExecErrorKind {
    /// Pop from an empty stack, or a frame read below the operand array.
    StackUnderflow,
    /// A computed stack index landed at or above `sp`.
    StackAddrOverflow {
        inst: String,
        addr: usize,
        limit: usize,
    },
    /// Segment offset outside the segment's declared size.
    SegOverflow { inst: String, len: usize },
    /// Effective heap address past the end of the heap.
    HeapAddrOverflow { inst: String, addr: usize },
    /// `pointer` segment offset outside `{0, 1}`.
    PointerIndex { offset: Word },
    /// `add` result does not fit in 16 bits.
    AddOverflow { x: Word, y: Word, sum: Wordbuf },
    /// `sub` with `x < y`.
    SubUnderflow { x: Word, y: Word },
    /// Control transfer to a symbol no file defines.
    UnknownSymbol { ident: String },
    /// Control transfer to a symbol defined in two or more foreign files.
    MultipleDefs { kind: SymKind, ident: String },
    /// `call` claiming more stack arguments than exist.
    BadArgCount { nargs: Word, sp: usize },
    /// Stdin reached EOF or the host read failed.
    ReadFailed,
    /// `Sys.read_num` saw something other than digits.
    ReadNumInvalid,
    /// `Sys.read_num` parsed a number above the 16-bit limit.
    ReadNumOverflow { num: u64 },
}

impl fmt::Display for ExecErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecErrorKind::StackUnderflow => f.write_str("stack underflow"),
            ExecErrorKind::StackAddrOverflow { inst, addr, limit } => write!(
                f,
                "stack address overflow: `{inst}` tries to access stack at {addr} (limit is at {limit})"
            ),
            ExecErrorKind::SegOverflow { inst, len } => {
                write!(f, "address overflow in `{inst}`: segment has {len} entries")
            }
            ExecErrorKind::HeapAddrOverflow { inst, addr } => {
                write!(f, "address overflow: `{inst}` tries to access heap at {addr}")
            }
            ExecErrorKind::PointerIndex { offset } => write!(
                f,
                "can't access pointer segment at `{offset}` (max. index is 1)"
            ),
            ExecErrorKind::AddOverflow { x, y, sum } => write!(
                f,
                "addition overflow: {x} + {y} = {sum} > {BIT16_LIMIT}"
            ),
            ExecErrorKind::SubUnderflow { x, y } => {
                let diff = i32::from(*x) - i32::from(*y);
                write!(f, "subtraction underflow: {x} - {y} = {diff} < 0")
            }
            ExecErrorKind::UnknownSymbol { ident } => {
                if ident == "Sys.init" {
                    f.write_str("can't jump to function `Sys.init`; Write it!")
                } else {
                    write!(f, "can't jump to {ident}")
                }
            }
            ExecErrorKind::MultipleDefs { kind, ident } => write!(
                f,
                "can't jump to {kind} {ident} because it's defined multiple times"
            ),
            ExecErrorKind::BadArgCount { nargs, sp } => write!(
                f,
                "given number of stack arguments ({nargs}) is wrong. There are only {sp} elements on the stack!"
            ),
            ExecErrorKind::ReadFailed => f.write_str("system read failed."),
            ExecErrorKind::ReadNumInvalid => {
                f.write_str("invalid input, `Sys.read_num` only accepts digits.")
            }
            ExecErrorKind::ReadNumOverflow { num } => write!(
                f,
                "number {num} read by `Sys.read_num` is too large. The limit is {BIT16_LIMIT}"
            ),
        }
    }
}

/// A fatal execution error, located at the instruction that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecError {
    pub kind: ExecErrorKind,
    /// Path of the file the failing instruction came from.
    pub path: String,
    /// Source text of that file, for rendering.
    pub src: String,
    pub pos: Pos,
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path, self.pos.line, self.pos.col, self.kind
        )
    }
}

impl std::error::Error for ExecError {}
