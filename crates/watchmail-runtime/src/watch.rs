//! The polling loop: run, compare, side effects, render, sleep.

use crate::exec::run_command;
use crate::notifier::ChangeNotification;
use crate::options::{DiffMode, WatchOptions};
use crate::render::{self, AnsiTerminal, TerminalWriter};
use crate::terminal::{TerminalGuard, dimensions};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use watchmail_core::ansi;
use watchmail_core::highlight::HighlightTracker;

/// Upper bound on one sleep slice, so quit and rerun requests are picked up
/// promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

enum SleepOutcome {
    Elapsed,
    Rerun,
    Quit,
}

/// Run the watch loop until a quit request, a change-triggered exit, or an
/// error-triggered exit. Returns the process exit code. The terminal is
/// restored exactly once on every path, including faults, via the guard.
pub fn run_watch(
    opts: &WatchOptions,
    notify_tx: Option<Sender<ChangeNotification>>,
) -> Result<i32> {
    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = quit.clone();
        ctrlc::set_handler(move || quit.store(true, Ordering::SeqCst))?;
    }

    // Raw-mode key handling only makes sense on a real terminal.
    let interactive = io::stdin().is_terminal();

    let mut guard = TerminalGuard::enter(interactive)?;
    let mut terminal = AnsiTerminal::new();
    let code = run_loop(opts, notify_tx, &quit, interactive, &mut terminal);
    guard.restore();

    code
}

fn run_loop(
    opts: &WatchOptions,
    notify_tx: Option<Sender<ChangeNotification>>,
    quit: &AtomicBool,
    interactive: bool,
    terminal: &mut dyn TerminalWriter,
) -> Result<i32> {
    let command_label = opts.command.join(" ");
    let default_subject = format!("watchmail: change detected in '{}'", command_label);

    let mut previous_raw: Option<String> = None;
    let mut previous_stripped: Option<String> = None;
    let mut tracker = HighlightTracker::new();

    loop {
        if quit.load(Ordering::SeqCst) {
            return Ok(0);
        }

        let result = run_command(&opts.command, opts.exec);
        let exit_code = result.exit_code;
        let command_duration = result.duration;
        let current_raw = result.stdout;
        let current_stripped = ansi::strip(&current_raw);

        // The first iteration has nothing to compare against and is never a
        // change.
        let changed = previous_stripped
            .as_deref()
            .is_some_and(|previous| previous != current_stripped);

        if changed {
            if opts.beep {
                print!("{}", ansi::BELL);
                let _ = io::stdout().flush();
            }

            if let (Some(tx), Some(email)) = (&notify_tx, &opts.email) {
                let change = ChangeNotification {
                    to: email.to.clone(),
                    from: email.from.clone(),
                    subject: email
                        .subject
                        .clone()
                        .unwrap_or_else(|| default_subject.clone()),
                    old_output: previous_stripped.clone().unwrap_or_default(),
                    new_output: current_stripped.clone(),
                    command: command_label.clone(),
                    cooldown: email.cooldown,
                };
                // Fire and forget: a slow or failed send never stalls the
                // next command run.
                let _ = tx.send(change);
            }

            if opts.chgexit {
                return Ok(0);
            }
        }

        if opts.errexit && exit_code != 0 {
            return Ok(exit_code);
        }

        let (cols, rows) = dimensions();
        let header = (!opts.no_title)
            .then(|| render::format_header(&command_label, opts.interval_secs, cols));

        let display = match (opts.differences, &previous_raw) {
            (DiffMode::Off, _) | (_, None) => {
                if opts.color {
                    current_raw.clone()
                } else {
                    current_stripped.clone()
                }
            }
            (mode, Some(previous)) => {
                let (old_text, new_text) = if opts.color {
                    (previous.as_str(), current_raw.as_str())
                } else {
                    (
                        previous_stripped.as_deref().unwrap_or(""),
                        current_stripped.as_str(),
                    )
                };
                let old_lines: Vec<&str> = old_text.split('\n').collect();
                let new_lines: Vec<&str> = new_text.split('\n').collect();
                tracker.render(&old_lines, &new_lines, mode == DiffMode::Accumulate)
            }
        };

        render::draw(
            terminal,
            header.as_deref(),
            &display,
            opts.no_color,
            opts.no_wrap,
            cols,
            rows,
        );

        previous_raw = Some(current_raw);
        previous_stripped = Some(current_stripped);

        let interval = Duration::from_secs_f64(opts.interval_secs);
        let target = if opts.precise {
            interval.saturating_sub(command_duration)
        } else {
            interval
        };

        match sleep_interruptibly(target, quit, interactive)? {
            SleepOutcome::Quit => return Ok(0),
            SleepOutcome::Rerun | SleepOutcome::Elapsed => {}
        }
    }
}

/// Wait out the interval in bounded slices, checking the quit flag at each
/// slice boundary and, on an interactive terminal, polling for the quit and
/// rerun keys.
fn sleep_interruptibly(
    target: Duration,
    quit: &AtomicBool,
    interactive: bool,
) -> Result<SleepOutcome> {
    let deadline = Instant::now() + target;

    loop {
        if quit.load(Ordering::SeqCst) {
            return Ok(SleepOutcome::Quit);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(SleepOutcome::Elapsed);
        }
        let slice = SLEEP_SLICE.min(deadline - now);

        if interactive {
            if event::poll(slice)? {
                if let Event::Key(key) = event::read()? {
                    match key_action(&key) {
                        Some(KeyAction::Quit) => return Ok(SleepOutcome::Quit),
                        Some(KeyAction::Rerun) => return Ok(SleepOutcome::Rerun),
                        None => {}
                    }
                }
            }
        } else {
            std::thread::sleep(slice);
        }
    }
}

enum KeyAction {
    Quit,
    Rerun,
}

fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char(' ') => Some(KeyAction::Rerun),
        _ => None,
    }
}
