mod error;
mod inst;
pub mod parser;
mod syntax;

pub use error::{ParseError, ParseErrorKind, Warning};
pub use inst::{Inst, Op, Segment};
pub use parser::{MAX_IDENT_LEN, ParsedUnit, Rule, VmParser, parse};
pub use syntax::{Pos, Span};
