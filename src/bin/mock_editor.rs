//! Mock line editor binary for integration testing
//!
//! Implements a tiny subset of a classic line editor so the harness can be
//! tested against a real interactive program without requiring one to be
//! installed.
//!
//! Commands: `i`, `a` (input mode until a lone `.`), `p`, `n`, `d`, `=`, `q`.
//! Addresses: `N`, `.`, `$`, `,` and `A,B` ranges. Errors print `?` to stderr.

use std::io::{self, BufRead, Write};

use clap::Parser;

#[derive(Parser)]
#[command(name = "mock_editor", about = "Minimal line editor used by pipecheck's tests")]
struct Args {
    /// Write this many bytes to stdout before reading any input
    #[arg(long, default_value_t = 0)]
    preamble_bytes: usize,

    /// Prompt printed before each command
    #[arg(long, short)]
    prompt: Option<String>,
}

fn main() {
    let args = Args::parse();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();

    if args.preamble_bytes > 0 {
        write_preamble(&mut writer, args.preamble_bytes).ok();
    }

    let mut editor = Editor::default();
    let mut line = String::new();

    loop {
        if let Some(prompt) = &args.prompt {
            write!(writer, "{}", prompt).ok();
            writer.flush().ok();
        }

        line.clear();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break; // EOF
        }

        let command = line.trim_end_matches(['\n', '\r']);
        match editor.execute(command, &mut reader, &mut writer) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(()) => {
                writer.flush().ok();
                eprintln!("?");
            }
        }
    }

    writer.flush().ok();
}

/// Lines of `#` padding, 63 characters and a newline each
fn write_preamble<W: Write>(writer: &mut W, bytes: usize) -> io::Result<()> {
    let mut remaining = bytes;
    let row = [b'#'; 63];
    while remaining > 0 {
        let chunk = remaining.min(64);
        if chunk == 64 {
            writer.write_all(&row)?;
            writer.write_all(b"\n")?;
        } else {
            writer.write_all(&row[..chunk])?;
        }
        remaining -= chunk;
    }
    writer.flush()
}

enum Flow {
    Continue,
    Quit,
}

#[derive(Default)]
struct Editor {
    lines: Vec<String>,
    /// 1-based; 0 means "before the first line"
    current: usize,
}

impl Editor {
    fn execute<R: BufRead, W: Write>(
        &mut self,
        command: &str,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<Flow, ()> {
        let (range, rest) = self.parse_range(command)?;
        let mut chars = rest.chars();
        let letter = chars.next();
        if chars.next().is_some() {
            return Err(());
        }

        match letter {
            Some('q') | Some('Q') if range.is_none() => Ok(Flow::Quit),
            Some('i') => {
                let at = range.map_or(self.current, |(_, end)| end).max(1) - 1;
                self.insert_at(at, reader)
            }
            Some('a') => {
                let at = range.map_or(self.current, |(_, end)| end);
                self.insert_at(at, reader)
            }
            Some('p') => self.print(range, writer, false),
            Some('n') => self.print(range, writer, true),
            Some('d') => {
                let (start, end) = self.checked(range)?;
                self.lines.drain(start - 1..end);
                self.current = if start <= self.lines.len() { start } else { self.lines.len() };
                Ok(Flow::Continue)
            }
            Some('=') => {
                let n = range.map_or(self.lines.len(), |(_, end)| end);
                writeln!(writer, "{}", n).map_err(|_| ())?;
                Ok(Flow::Continue)
            }
            None => {
                // A bare address moves to and prints that line
                let (_, end) = self.checked(range.or(Some((self.current + 1, self.current + 1))))?;
                self.print(Some((end, end)), writer, false)
            }
            _ => Err(()),
        }
    }

    /// Read input-mode lines and insert them after line `at`
    fn insert_at<R: BufRead>(&mut self, at: usize, reader: &mut R) -> Result<Flow, ()> {
        if at > self.lines.len() {
            return Err(());
        }
        let mut added = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                break;
            }
            let text = line.trim_end_matches(['\n', '\r']);
            if text == "." {
                break;
            }
            added.push(text.to_string());
        }
        let count = added.len();
        self.lines.splice(at..at, added);
        self.current = at + count;
        Ok(Flow::Continue)
    }

    fn print<W: Write>(
        &mut self,
        range: Option<(usize, usize)>,
        writer: &mut W,
        numbered: bool,
    ) -> Result<Flow, ()> {
        let (start, end) = self.checked(range)?;
        for n in start..=end {
            let text = &self.lines[n - 1];
            let written = if numbered {
                writeln!(writer, "{:>6}\t{}", n, text)
            } else {
                writeln!(writer, "{}", text)
            };
            written.map_err(|_| ())?;
        }
        self.current = end;
        Ok(Flow::Continue)
    }

    /// Validate a range against the buffer, defaulting to the current line
    fn checked(&self, range: Option<(usize, usize)>) -> Result<(usize, usize), ()> {
        let (start, end) = range.unwrap_or((self.current, self.current));
        if start == 0 || start > end || end > self.lines.len() {
            return Err(());
        }
        Ok((start, end))
    }

    /// Split a command into its optional address range and the remainder
    fn parse_range<'a>(&self, command: &'a str) -> Result<(Option<(usize, usize)>, &'a str), ()> {
        if let Some(rest) = command.strip_prefix(',') {
            let addressed = rest.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '$');
            if rest.is_empty() || !addressed {
                return Ok((Some((1, self.lines.len())), rest));
            }
        }

        let (first, rest) = self.parse_address(command)?;
        let Some(first) = first else {
            return Ok((None, rest));
        };

        if let Some(after_comma) = rest.strip_prefix(',') {
            let (second, rest) = self.parse_address(after_comma)?;
            let second = second.ok_or(())?;
            return Ok((Some((first, second)), rest));
        }

        Ok((Some((first, first)), rest))
    }

    fn parse_address<'a>(&self, text: &'a str) -> Result<(Option<usize>, &'a str), ()> {
        if let Some(rest) = text.strip_prefix('.') {
            return Ok((Some(self.current), rest));
        }
        if let Some(rest) = text.strip_prefix('$') {
            return Ok((Some(self.lines.len()), rest));
        }

        let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return Ok((None, text));
        }
        let n = text[..digits].parse().map_err(|_| ())?;
        Ok((Some(n), &text[digits..]))
    }
}
