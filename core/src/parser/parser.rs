use std::sync::Arc;

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::debug;

use super::error::{ParseError, ParseErrorKind, Warning};
use super::inst::{Inst, Op, Segment};
use super::syntax::{Pos, Span};
use crate::program::{SymKind, SymVal, SymbolTable};
use crate::vm::Word;

/// Identifiers longer than this are truncated (with a warning), matching
/// the fixed-width token buffer of the VM dialect this parser accepts.
pub const MAX_IDENT_LEN: usize = 24;

#[derive(Parser)]
#[grammar = "parser/vm.pest"]
pub struct VmParser;

/// Everything parsing one translation unit produces: the executable
/// instruction stream, the symbol table binding `label`/`function`
/// definitions to instruction addresses, and any warnings.
#[derive(Debug)]
pub struct ParsedUnit {
    pub insts: Vec<Inst>,
    pub symbols: SymbolTable,
    pub warnings: Vec<Warning>,
}

pub fn parse(source: &str) -> Result<ParsedUnit, ParseError> {
    let mut pairs =
        VmParser::parse(Rule::program, source).map_err(|e| from_pest(source, &e))?;

    let mut insts: Vec<Inst> = Vec::new();
    let mut symbols = SymbolTable::new();
    let mut warnings = Vec::new();

    if !source.is_empty() && !source.ends_with('\n') {
        warnings.push(Warning::NoFinalNewline);
    }

    let program = pairs.next().expect("grammar: program is the root rule");
    for pair in program.into_inner() {
        let pos = pos_of(&pair);
        match pair.as_rule() {
            Rule::EOI => {}
            Rule::push => {
                let (seg, offset) = mem_operands(pair, &mut warnings);
                insts.push(Inst::new(Op::Push { seg, offset }, pos));
            }
            Rule::pop => {
                let (seg, offset) = mem_operands(pair, &mut warnings);
                insts.push(Inst::new(Op::Pop { seg, offset }, pos));
            }
            Rule::arith => insts.push(Inst::new(arith_op(pair.as_str()), pos)),
            Rule::ret => insts.push(Inst::new(Op::Return, pos)),
            Rule::label_def => {
                let ident = ident_operand(pair, &mut warnings);
                define(
                    &mut symbols,
                    &ident,
                    SymKind::Label,
                    SymVal {
                        inst_addr: insts.len(),
                        nlocals: 0,
                    },
                    source,
                    pos,
                )?;
            }
            Rule::func_def => {
                let (ident, nlocals) = ident_uint_operands(pair, &mut warnings);
                define(
                    &mut symbols,
                    &ident,
                    SymKind::Func,
                    SymVal {
                        inst_addr: insts.len(),
                        nlocals,
                    },
                    source,
                    pos,
                )?;
            }
            Rule::goto_inst => {
                let ident = ident_operand(pair, &mut warnings);
                insts.push(Inst::new(Op::Goto { ident }, pos));
            }
            Rule::if_goto => {
                let ident = ident_operand(pair, &mut warnings);
                insts.push(Inst::new(Op::IfGoto { ident }, pos));
            }
            Rule::call_inst => {
                let (ident, nargs) = ident_uint_operands(pair, &mut warnings);
                // Calls to the I/O builtins become dedicated opcodes; the
                // engine only resolves user symbols.
                let op = builtin_op(&ident).unwrap_or(Op::Call { ident, nargs });
                insts.push(Inst::new(op, pos));
            }
            rule => unreachable!("grammar: unexpected rule {rule:?}"),
        }
    }

    debug!(
        insts = insts.len(),
        warnings = warnings.len(),
        "parsed translation unit"
    );
    Ok(ParsedUnit {
        insts,
        symbols,
        warnings,
    })
}

fn define(
    symbols: &mut SymbolTable,
    ident: &Arc<str>,
    kind: SymKind,
    val: SymVal,
    source: &str,
    pos: Pos,
) -> Result<(), ParseError> {
    if symbols.define(ident, kind, val) {
        Ok(())
    } else {
        Err(ParseError {
            kind: ParseErrorKind::DuplicateSymbol {
                kind,
                ident: ident.to_string(),
            },
            source: source.to_string(),
            path: String::new(),
            span: pos.span,
            line: pos.line,
            col: pos.col,
        })
    }
}

fn pos_of(pair: &Pair<'_, Rule>) -> Pos {
    let span = pair.as_span();
    let (line, col) = pair.line_col();
    Pos::new(line, col, Span::new(span.start(), span.end()))
}

fn mem_operands(pair: Pair<'_, Rule>, warnings: &mut Vec<Warning>) -> (Segment, Word) {
    let mut inner = pair.into_inner();
    let _kw = inner.next();
    let seg = segment(inner.next().expect("grammar: segment").as_str());
    let offset = parse_uint(inner.next().expect("grammar: offset").as_str(), warnings);
    (seg, offset)
}

fn ident_operand(pair: Pair<'_, Rule>, warnings: &mut Vec<Warning>) -> Arc<str> {
    let mut inner = pair.into_inner();
    let _kw = inner.next();
    parse_ident(inner.next().expect("grammar: identifier").as_str(), warnings)
}

fn ident_uint_operands(pair: Pair<'_, Rule>, warnings: &mut Vec<Warning>) -> (Arc<str>, Word) {
    let mut inner = pair.into_inner();
    let _kw = inner.next();
    let ident = parse_ident(inner.next().expect("grammar: identifier").as_str(), warnings);
    let n = parse_uint(inner.next().expect("grammar: count").as_str(), warnings);
    (ident, n)
}

fn segment(text: &str) -> Segment {
    match text {
        "argument" => Segment::Arg,
        "local" => Segment::Loc,
        "static" => Segment::Stat,
        "constant" => Segment::Const,
        "this" => Segment::This,
        "that" => Segment::That,
        "pointer" => Segment::Ptr,
        "temp" => Segment::Tmp,
        _ => unreachable!("grammar: segment `{text}`"),
    }
}

fn arith_op(text: &str) -> Op {
    match text {
        "add" => Op::Add,
        "sub" => Op::Sub,
        "neg" => Op::Neg,
        "and" => Op::And,
        "or" => Op::Or,
        "not" => Op::Not,
        "eq" => Op::Eq,
        "lt" => Op::Lt,
        "gt" => Op::Gt,
        _ => unreachable!("grammar: arithmetic op `{text}`"),
    }
}

fn builtin_op(ident: &str) -> Option<Op> {
    match ident {
        "Sys.print_char" => Some(Op::PrintChar),
        "Sys.print_num" => Some(Op::PrintNum),
        "Sys.print_str" => Some(Op::PrintStr),
        "Sys.read_char" => Some(Op::ReadChar),
        "Sys.read_num" => Some(Op::ReadNum),
        "Sys.read_str" => Some(Op::ReadStr),
        _ => None,
    }
}

/// Decimal literal, saturated to the 16-bit range with a warning.
fn parse_uint(text: &str, warnings: &mut Vec<Warning>) -> Word {
    match text.parse::<u64>() {
        Ok(n) if n <= u64::from(u16::MAX) => n as Word,
        _ => {
            warnings.push(Warning::SaturatedLiteral {
                text: text.to_string(),
            });
            u16::MAX
        }
    }
}

/// Identifier, truncated to [`MAX_IDENT_LEN`] with a warning. Identifier
/// characters are ASCII, so byte truncation is safe.
fn parse_ident(text: &str, warnings: &mut Vec<Warning>) -> Arc<str> {
    if text.len() > MAX_IDENT_LEN {
        warnings.push(Warning::TruncatedIdent {
            ident: text.to_string(),
        });
        Arc::from(&text[..MAX_IDENT_LEN])
    } else {
        Arc::from(text)
    }
}

fn from_pest(source: &str, e: &pest::error::Error<Rule>) -> ParseError {
    use pest::error::{InputLocation, LineColLocation};

    let (start, end) = match e.location {
        InputLocation::Pos(p) => (p, (p + 1).min(source.len())),
        InputLocation::Span((s, e)) => (s, e),
    };
    let (line, col) = match e.line_col {
        LineColLocation::Pos((line, col)) => (line, col),
        LineColLocation::Span((line, col), _) => (line, col),
    };
    ParseError::syntax(
        source,
        Span::new(start, end),
        line,
        col,
        e.variant.message().into_owned(),
    )
}
