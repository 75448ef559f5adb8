//! Frame rendering: header formatting, row/column fitting, and the
//! terminal writer seam that keeps the draw path testable.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use watchmail_core::ansi;

pub trait TerminalWriter: Send {
    fn clear_screen(&mut self);
    fn write_line(&mut self, line: &str);
    fn flush(&mut self);
}

/// Writes frames to stdout with raw ANSI control codes. Lines end in CRLF
/// so output stays aligned while raw mode is active.
pub struct AnsiTerminal;

impl Default for AnsiTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsiTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl TerminalWriter for AnsiTerminal {
    fn clear_screen(&mut self) {
        print!("{}{}", ansi::CURSOR_HOME, ansi::CLEAR_SCREEN);
    }

    fn write_line(&mut self, line: &str) {
        print!("{}\r\n", line);
    }

    fn flush(&mut self) {
        let _ = io::stdout().flush();
    }
}

/// In-memory terminal for render tests.
pub struct MockTerminal {
    pub lines: Vec<String>,
    pub clear_count: usize,
    pub flush_count: usize,
}

impl Default for MockTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTerminal {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            clear_count: 0,
            flush_count: 0,
        }
    }
}

impl TerminalWriter for MockTerminal {
    fn clear_screen(&mut self) {
        self.clear_count += 1;
        self.lines.clear();
    }

    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn flush(&mut self) {
        self.flush_count += 1;
    }
}

/// One-line header: command and interval on the left, host and local time
/// on the right, padded to the terminal width.
pub fn format_header(command: &str, interval_secs: f64, cols: usize) -> String {
    let left = format!("Every {:.1}s: {}", interval_secs, command);
    let right = format!(
        "{}: {}",
        host_name(),
        chrono::Local::now().format("%a %b %e %H:%M:%S %Y")
    );
    let padding = cols
        .saturating_sub(left.chars().count() + right.chars().count())
        .max(1);
    format!("{}", format!("{}{}{}", left, " ".repeat(padding), right).bold())
}

/// Draw a full frame: clear, optional header plus blank spacer, then the
/// body clamped to the rows left over, optionally stripped of color and
/// truncated to the column width.
pub fn draw(
    terminal: &mut dyn TerminalWriter,
    header: Option<&str>,
    output: &str,
    strip_colors: bool,
    truncate_lines: bool,
    cols: usize,
    rows: usize,
) {
    terminal.clear_screen();

    let mut header_rows = 0;
    if let Some(header) = header {
        terminal.write_line(header);
        terminal.write_line("");
        header_rows = 2;
    }

    let available_rows = rows.saturating_sub(header_rows);
    let mut lines: Vec<String> = output.split('\n').map(str::to_string).collect();

    if strip_colors {
        lines = lines.iter().map(|line| ansi::strip(line)).collect();
    }

    if truncate_lines {
        lines = lines
            .iter()
            .map(|line| ansi::truncate_to_width(line, cols))
            .collect();
    }

    lines.truncate(available_rows);

    for line in &lines {
        terminal.write_line(line);
    }
    terminal.flush();
}

#[cfg(unix)]
fn host_name() -> String {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc == 0 {
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        String::from_utf8_lossy(&buf[..end]).into_owned()
    } else {
        "localhost".to_string()
    }
}

#[cfg(not(unix))]
fn host_name() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "localhost".to_string())
}
