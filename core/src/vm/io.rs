//! The console seam between the VM's I/O built-ins and the host.
//!
//! The engine never touches stdin/stdout directly; it goes through
//! [`Console`] so that embedders and tests can script input and capture
//! output. [`StdConsole`] is the process-standard implementation.

use std::fmt;
use std::io::{self, Read, Write};

pub trait Console {
    /// Read one byte. `Ok(None)` signals end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Look at the next byte without consuming it.
    fn peek_byte(&mut self) -> io::Result<Option<u8>>;

    /// Emit raw bytes. Output is best-effort: like the C runtime the VM
    /// was modeled on, write failures do not abort execution.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Emit formatted text.
    fn print(&mut self, args: fmt::Arguments<'_>) {
        self.write_bytes(args.to_string().as_bytes());
    }
}

/// Console over the process's standard streams, with a one-byte pushback
/// buffer to support peeking.
pub struct StdConsole {
    pending: Option<u8>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        let mut buf = [0u8; 1];
        match io::stdin().lock().read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pending.is_none() {
            let mut buf = [0u8; 1];
            if io::stdin().lock().read(&mut buf)? == 0 {
                return Ok(None);
            }
            self.pending = Some(buf[0]);
        }
        Ok(self.pending)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let _ = io::stdout().lock().write_all(bytes);
    }

    fn print(&mut self, args: fmt::Arguments<'_>) {
        let _ = io::stdout().lock().write_fmt(args);
    }
}

/// In-memory console for tests and headless embedding: reads from a fixed
/// input buffer, captures all output.
#[derive(Debug, Default)]
pub struct MemConsole {
    input: Vec<u8>,
    cursor: usize,
    pub output: Vec<u8>,
}

impl MemConsole {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            cursor: 0,
            output: Vec::new(),
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Console for MemConsole {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.input.get(self.cursor) {
            Some(&b) => {
                self.cursor += 1;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.get(self.cursor).copied())
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }
}

/// What scanning stdin for an unsigned decimal produced.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ScanNum {
    /// End of input before any non-whitespace character.
    Eof,
    /// The first non-whitespace character was not a digit. The remainder
    /// of the offending line has been consumed.
    NoDigits,
    /// A digit run, accumulated with saturation (the 16-bit range check
    /// happens at the caller).
    Num(u64),
}

/// Scan an unsigned decimal the way `scanf("%u")` does: skip whitespace
/// (newlines included), then consume a maximal digit run, leaving the
/// delimiter unread.
pub(crate) fn scan_uint<C: Console + ?Sized>(console: &mut C) -> io::Result<ScanNum> {
    loop {
        match console.peek_byte()? {
            Some(b) if b.is_ascii_whitespace() => {
                console.read_byte()?;
            }
            Some(_) => break,
            None => return Ok(ScanNum::Eof),
        }
    }

    match console.peek_byte()? {
        Some(b) if b.is_ascii_digit() => {}
        _ => {
            // Invalid input: drain the rest of the line so the stream is
            // positioned at the next one.
            loop {
                match console.read_byte()? {
                    None | Some(b'\n') => break,
                    Some(_) => {}
                }
            }
            return Ok(ScanNum::NoDigits);
        }
    }

    let mut num: u64 = 0;
    while let Some(b) = console.peek_byte()? {
        if !b.is_ascii_digit() {
            break;
        }
        console.read_byte()?;
        num = num.saturating_mul(10).saturating_add(u64::from(b - b'0'));
    }
    Ok(ScanNum::Num(num))
}

/// Read one line, including its trailing newline if the input has one.
/// `Ok(None)` means end of input before any byte was read.
pub(crate) fn read_line<C: Console + ?Sized>(console: &mut C) -> io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    loop {
        match console.read_byte()? {
            None => break,
            Some(b) => {
                buf.push(b);
                if b == b'\n' {
                    break;
                }
            }
        }
    }
    if buf.is_empty() { Ok(None) } else { Ok(Some(buf)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_console_reads_and_peeks() {
        let mut console = MemConsole::new(b"ab");
        assert_eq!(console.peek_byte().unwrap(), Some(b'a'));
        assert_eq!(console.read_byte().unwrap(), Some(b'a'));
        assert_eq!(console.read_byte().unwrap(), Some(b'b'));
        assert_eq!(console.peek_byte().unwrap(), None);
        assert_eq!(console.read_byte().unwrap(), None);
    }

    #[test]
    fn mem_console_captures_output() {
        let mut console = MemConsole::new(b"");
        console.print(format_args!("{}", 42));
        console.write_bytes(b"!");
        assert_eq!(console.output_str(), "42!");
    }

    #[test]
    fn scan_uint_skips_whitespace() {
        let mut console = MemConsole::new(b"  \n\t 123 rest");
        assert_eq!(scan_uint(&mut console).unwrap(), ScanNum::Num(123));
        // The delimiter is left in the stream.
        assert_eq!(console.read_byte().unwrap(), Some(b' '));
    }

    #[test]
    fn scan_uint_eof() {
        let mut console = MemConsole::new(b"   \n ");
        assert_eq!(scan_uint(&mut console).unwrap(), ScanNum::Eof);
    }

    #[test]
    fn scan_uint_invalid_drains_the_line() {
        let mut console = MemConsole::new(b"abc def\n42\n");
        assert_eq!(scan_uint(&mut console).unwrap(), ScanNum::NoDigits);
        // The next line is still available.
        assert_eq!(scan_uint(&mut console).unwrap(), ScanNum::Num(42));
    }

    #[test]
    fn scan_uint_stops_at_nondigit() {
        let mut console = MemConsole::new(b"123abc");
        assert_eq!(scan_uint(&mut console).unwrap(), ScanNum::Num(123));
        assert_eq!(console.read_byte().unwrap(), Some(b'a'));
    }

    #[test]
    fn read_line_keeps_newline() {
        let mut console = MemConsole::new(b"hello\nworld");
        assert_eq!(read_line(&mut console).unwrap(), Some(b"hello\n".to_vec()));
        assert_eq!(read_line(&mut console).unwrap(), Some(b"world".to_vec()));
        assert_eq!(read_line(&mut console).unwrap(), None);
    }
}
