//! ANSI escape sequence handling: stripping for change comparison and
//! width-aware truncation for the no-wrap display mode.

use once_cell::sync::Lazy;
use regex::Regex;

pub const ESC: char = '\x1b';

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const REVERSE: &str = "\x1b[7m";
pub const RESET: &str = "\x1b[0m";
pub const BELL: &str = "\x07";

static CSI_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\x1b\\[[0-9;]*[a-zA-Z]").expect("CSI pattern"));

// Only the BEL terminator is recognized. OSC sequences closed with the
// two-byte ST terminator pass through unchanged.
static OSC_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\x1b\\][^\x07]*\x07").expect("OSC pattern"));

/// Remove recognized terminal control sequences so output can be measured
/// and compared independent of embedded styling. Idempotent.
pub fn strip(text: &str) -> String {
    let without_csi = CSI_SEQUENCE.replace_all(text, "");
    OSC_SEQUENCE.replace_all(&without_csi, "").into_owned()
}

/// Truncate `line` to `max_width` display columns. Control sequences are
/// copied through in full at zero width cost; every other character costs
/// one column. No wide-character awareness: one char is one column.
pub fn truncate_to_width(line: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let mut width = 0;
    let mut out = String::with_capacity(line.len());
    let mut in_escape = false;

    for ch in line.chars() {
        if ch == ESC {
            in_escape = true;
            out.push(ch);
            continue;
        }
        if in_escape {
            out.push(ch);
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
            continue;
        }
        if width >= max_width {
            break;
        }
        out.push(ch);
        width += 1;
    }

    out
}
