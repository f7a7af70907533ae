use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jackal::{Error, render_error, render_error_to_string_no_color};
use jackal_core::parser;
use jackal_core::program::{File, Program};
use jackal_core::vm::{StdConsole, Vm};
use miette::{IntoDiagnostic, WrapErr};
use nu_ansi_term::Color::Yellow;

/// Jackal - an interpreter for Jack-family VM translation units
#[derive(Parser, Debug)]
#[command(name = "jackal")]
#[command(about = "Execute VM translation units", long_about = None)]
struct Args {
    /// Print the parsed instruction listing and symbol tables (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// VM source files to load and execute
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn warn(use_color: bool, msg: &str) {
    if use_color {
        eprintln!("{} {msg}", Yellow.paint("Warn:"));
    } else {
        eprintln!("Warn: {msg}");
    }
}

fn report(error: &Error, use_color: bool) {
    if use_color {
        render_error(error);
    } else {
        eprint!("{}", render_error_to_string_no_color(error));
    }
}

fn dump_listing(files: &[File]) {
    for file in files {
        println!("=== {} ===", file.path);
        let mut symbols: Vec<_> = file.symbols.iter().collect();
        symbols.sort_by_key(|(_, _, val)| val.inst_addr);
        for (ident, kind, val) in symbols {
            println!("  {kind} {ident} -> {} ({} locals)", val.inst_addr, val.nlocals);
        }
        for (addr, inst) in file.insts.iter().enumerate() {
            println!("  {addr:4}  {}", inst.op);
        }
        println!();
    }
}

fn main() -> miette::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use the RUST_LOG environment variable to control the log level;
    // default to WARN if not set.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap();

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let use_color = atty::is(atty::Stream::Stderr);

    let mut files = Vec::new();
    for path in &args.files {
        if path.extension().and_then(|e| e.to_str()) != Some("vm") {
            warn(
                use_color,
                &format!("file `{}` doesn't have the `.vm` extension", path.display()),
            );
        }
        let source = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("can't read `{}`", path.display()))?;
        let display = path.display().to_string();
        match parser::parse(&source) {
            Ok(unit) => {
                for warning in &unit.warnings {
                    warn(use_color, &format!("{display}: {warning}"));
                }
                files.push(File::new(display, source, unit));
            }
            Err(e) => {
                report(&Error::Parse(e.with_path(&display)), use_color);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    if args.debug_parse {
        dump_listing(&files);
    }

    let mut prog = Program::new(files);
    let mut console = StdConsole::new();
    match Vm::new(&mut prog, &mut console).run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            report(&Error::Exec(e), use_color);
            Ok(ExitCode::FAILURE)
        }
    }
}
