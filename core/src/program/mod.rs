//! Program assembly: translation units, symbol resolution, and the loader.

mod symbols;

pub use symbols::{SymKind, SymVal, SymbolTable};

use tracing::{debug, info};

use crate::parser::{Inst, ParsedUnit};
use crate::vm::{Heap, Memory, Stack};

/// A loaded translation unit: its instructions, symbol table, private
/// `static`/`temp` memory, source text (kept for error reporting), and the
/// cursor of the next instruction to execute.
#[derive(Debug)]
pub struct File {
    pub path: String,
    pub source: String,
    pub insts: Vec<Inst>,
    pub symbols: SymbolTable,
    pub mem: Memory,
    pub ei: usize,
}

impl File {
    pub fn new(path: String, source: String, unit: ParsedUnit) -> Self {
        Self {
            path,
            source,
            insts: unit.insts,
            symbols: unit.symbols,
            mem: Memory::new(),
            ei: 0,
        }
    }
}

/// Outcome of a failed cross-file symbol search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    Undefined,
    MultiplyDefined,
}

/// A whole program: its translation units, the active-file cursor, and the
/// global stack and heap. All VM state lives here; the executor borrows it
/// exclusively for the duration of a run.
#[derive(Debug)]
pub struct Program {
    pub files: Vec<File>,
    pub fi: usize,
    pub stack: Stack,
    pub heap: Heap,
}

impl Program {
    /// Assemble a program from loaded files and pick the entry unit: the
    /// first file defining `Sys.init` as a function, or file 0 if none
    /// does. Execution always starts at instruction 0 of the entry unit;
    /// since definitions are not materialized, a file that opens with
    /// `function Sys.init n` starts directly in its body.
    pub fn new(files: Vec<File>) -> Self {
        let fi = files
            .iter()
            .position(|f| f.symbols.lookup("Sys.init", SymKind::Func).is_some())
            .unwrap_or(0);
        if let Some(entry) = files.get(fi) {
            info!(files = files.len(), entry = %entry.path, "program loaded");
        }
        Self {
            files,
            fi,
            stack: Stack::new(),
            heap: Heap::new(),
        }
    }

    /// Resolve `(ident, kind)` for a control transfer.
    ///
    /// The active file is preferred; only on a miss are the other files
    /// scanned, in file order. Exactly one foreign definition wins; none
    /// is undefined; two or more is ambiguous (the scan stops as soon as a
    /// second definition is seen — classification doesn't need the rest).
    pub fn resolve(&self, ident: &str, kind: SymKind) -> Result<(usize, SymVal), ResolveError> {
        if let Some(val) = self.files[self.fi].symbols.lookup(ident, kind) {
            return Ok((self.fi, val));
        }

        let mut found = None;
        let mut ndefs = 0;
        for (fi, file) in self.files.iter().enumerate() {
            if fi == self.fi {
                continue;
            }
            if let Some(val) = file.symbols.lookup(ident, kind) {
                found = Some((fi, val));
                ndefs += 1;
                if ndefs > 1 {
                    break;
                }
            }
        }

        match (ndefs, found) {
            (0, _) => Err(ResolveError::Undefined),
            (1, Some(hit)) => {
                debug!(ident, ?kind, file = hit.0, "resolved in foreign file");
                Ok(hit)
            }
            _ => Err(ResolveError::MultiplyDefined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn file(path: &str, source: &str) -> File {
        let unit = parse(source).expect("test source should parse");
        File::new(path.to_string(), source.to_string(), unit)
    }

    #[test]
    fn entry_is_the_file_defining_sys_init() {
        let prog = Program::new(vec![
            file("a.vm", "push constant 1\n"),
            file("b.vm", "function Sys.init 0\nreturn\n"),
        ]);
        assert_eq!(prog.fi, 1);
    }

    #[test]
    fn entry_defaults_to_file_zero() {
        let prog = Program::new(vec![
            file("a.vm", "push constant 1\n"),
            file("b.vm", "push constant 2\n"),
        ]);
        assert_eq!(prog.fi, 0);
    }

    #[test]
    fn active_file_shadows_foreign_definitions() {
        let mut prog = Program::new(vec![
            file("a.vm", "function M.f 0\nreturn\n"),
            file("b.vm", "function M.f 1\nreturn\n"),
        ]);
        prog.fi = 0;
        let (fi, val) = prog.resolve("M.f", SymKind::Func).expect("resolves");
        assert_eq!(fi, 0);
        assert_eq!(val.nlocals, 0);
    }

    #[test]
    fn single_foreign_definition_wins() {
        let mut prog = Program::new(vec![
            file("a.vm", "push constant 1\n"),
            file("b.vm", "function M.f 3\nreturn\n"),
        ]);
        prog.fi = 0;
        let (fi, val) = prog.resolve("M.f", SymKind::Func).expect("resolves");
        assert_eq!(fi, 1);
        assert_eq!(val.nlocals, 3);
    }

    #[test]
    fn unresolved_symbol() {
        let prog = Program::new(vec![file("a.vm", "push constant 1\n")]);
        assert_eq!(
            prog.resolve("nowhere", SymKind::Label),
            Err(ResolveError::Undefined)
        );
    }

    #[test]
    fn two_foreign_definitions_are_ambiguous() {
        let mut prog = Program::new(vec![
            file("a.vm", "push constant 1\n"),
            file("b.vm", "function M.f 0\nreturn\n"),
            file("c.vm", "function M.f 0\nreturn\n"),
        ]);
        prog.fi = 0;
        assert_eq!(
            prog.resolve("M.f", SymKind::Func),
            Err(ResolveError::MultiplyDefined)
        );
    }
}
