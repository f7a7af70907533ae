use std::fmt;
use std::sync::Arc;

use super::syntax::Pos;
use crate::vm::Word;

/// A parsed, executable instruction with its source position.
///
/// `label` and `function` definitions never appear here; the parser folds
/// them into the symbol table so that control transfers land directly on
/// the first instruction after the definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Inst {
    pub op: Op,
    pub pos: Pos,
}

impl Inst {
    pub fn new(op: Op, pos: Pos) -> Self {
        Self { op, pos }
    }
}

/// The named memory regions push/pop can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Arg,
    Loc,
    Stat,
    Const,
    This,
    That,
    Ptr,
    Tmp,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Arg => "argument",
            Segment::Loc => "local",
            Segment::Stat => "static",
            Segment::Const => "constant",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Ptr => "pointer",
            Segment::Tmp => "temp",
        };
        f.write_str(name)
    }
}

/// Instruction payloads. Identifiers are shared `Arc<str>`s so cloning an
/// instruction for dispatch is a refcount bump.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Push { seg: Segment, offset: Word },
    Pop { seg: Segment, offset: Word },
    Add,
    Sub,
    Neg,
    And,
    Or,
    Not,
    Eq,
    Lt,
    Gt,
    Goto { ident: Arc<str> },
    IfGoto { ident: Arc<str> },
    Call { ident: Arc<str>, nargs: Word },
    Return,
    // `call Sys.*` lowered at parse time; these never reach symbol lookup.
    PrintChar,
    PrintNum,
    PrintStr,
    ReadChar,
    ReadNum,
    ReadStr,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Push { seg, offset } => write!(f, "push {seg} {offset}"),
            Op::Pop { seg, offset } => write!(f, "pop {seg} {offset}"),
            Op::Add => f.write_str("add"),
            Op::Sub => f.write_str("sub"),
            Op::Neg => f.write_str("neg"),
            Op::And => f.write_str("and"),
            Op::Or => f.write_str("or"),
            Op::Not => f.write_str("not"),
            Op::Eq => f.write_str("eq"),
            Op::Lt => f.write_str("lt"),
            Op::Gt => f.write_str("gt"),
            Op::Goto { ident } => write!(f, "goto {ident}"),
            Op::IfGoto { ident } => write!(f, "if-goto {ident}"),
            Op::Call { ident, nargs } => write!(f, "call {ident} {nargs}"),
            Op::Return => f.write_str("return"),
            Op::PrintChar => f.write_str("call Sys.print_char"),
            Op::PrintNum => f.write_str("call Sys.print_num"),
            Op::PrintStr => f.write_str("call Sys.print_str"),
            Op::ReadChar => f.write_str("call Sys.read_char"),
            Op::ReadNum => f.write_str("call Sys.read_num"),
            Op::ReadStr => f.write_str("call Sys.read_str"),
        }
    }
}
