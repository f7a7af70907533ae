//! Error rendering using ariadne
//!
//! Turns parse and execution errors into `Error:` reports on stderr with
//! the offending instruction underlined in its source context.

use crate::Error;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error with source context to stderr.
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer.
///
/// Useful when the report should go to a file, a buffer, or a custom
/// output stream instead of stderr.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for tests and embedding).
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without colour codes.
///
/// Same as [`render_error_to_string`] but without ANSI escapes, for
/// non-tty output and easy comparison in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let (path, src, span, message) = match error {
        Error::Parse(e) => (e.path.as_str(), e.source.as_str(), e.span, e.kind.to_string()),
        Error::Exec(e) => (e.path.as_str(), e.src.as_str(), e.pos.span, e.kind.to_string()),
    };
    let path = if path.is_empty() { "<input>" } else { path };
    let range = span.start..span.end;

    Report::build(ReportKind::Error, (path, range.clone()))
        .with_config(Config::default().with_color(use_color))
        .with_message(&message)
        .with_label(Label::new((path, range)).with_color(Color::Red))
        .finish()
        .write((path, Source::from(src)), writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, MemConsole, Program, Vm};

    fn exec_error(src: &str) -> Error {
        let unit = crate::parser::parse(src).expect("test source should parse");
        let mut prog = Program::new(vec![File::new(
            "demo.vm".to_string(),
            src.to_string(),
            unit,
        )]);
        let mut console = MemConsole::new(b"");
        let err = Vm::new(&mut prog, &mut console)
            .run()
            .expect_err("test source should fail");
        Error::Exec(err)
    }

    #[test]
    fn renders_message_and_position() {
        let report =
            render_error_to_string_no_color(&exec_error("push constant 65535\npush constant 1\nadd\n"));
        assert!(report.contains("Error"), "report: {report}");
        assert!(
            report.contains("addition overflow: 65535 + 1 = 65536 > 65535"),
            "report: {report}"
        );
        assert!(report.contains("demo.vm"), "report: {report}");
        // The failing instruction is on line 3.
        assert!(report.contains("3"), "report: {report}");
    }

    #[test]
    fn renders_parse_errors() {
        let err = crate::parser::parse("push constant oops\n").expect_err("bad offset");
        let report = render_error_to_string_no_color(&Error::Parse(err.with_path("bad.vm")));
        assert!(report.contains("Error"), "report: {report}");
        assert!(report.contains("bad.vm"), "report: {report}");
    }

    #[test]
    fn colored_output_contains_escapes() {
        let plain = render_error_to_string_no_color(&exec_error("add\n"));
        let colored = render_error_to_string(&exec_error("add\n"));
        assert!(!plain.contains('\u{1b}'));
        assert!(colored.contains('\u{1b}'));
    }
}
