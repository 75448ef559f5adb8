//! Notification cooldown engine: at most one email per cooldown window,
//! with changes observed during an active window coalesced into a single
//! pending slot.

use crate::transport::{EmailMessage, EmailTransport};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use watchmail_core::diff;

/// How often the worker wakes up to flush a queued change whose cooldown
/// has lapsed.
const FLUSH_TICK: Duration = Duration::from_millis(500);

/// A detected output change, as handed to the notification engine.
#[derive(Debug, Clone)]
pub struct ChangeNotification {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub old_output: String,
    pub new_output: String,
    pub command: String,
    pub cooldown: Duration,
}

/// Result of a notify or flush call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub sent: bool,
    pub reason: Option<String>,
}

impl Outcome {
    fn sent() -> Self {
        Self {
            sent: true,
            reason: None,
        }
    }

    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            sent: false,
            reason: Some(reason.into()),
        }
    }
}

/// Owns the cooldown clock and the single pending-change slot.
///
/// The clock advances only on a successful send; a failed attempt leaves it
/// untouched so the next change is retried instead of waiting out a cooldown
/// that never bought anything.
pub struct Notifier {
    transport: Box<dyn EmailTransport>,
    last_sent: Option<Instant>,
    pending: Option<ChangeNotification>,
}

impl Notifier {
    pub fn new(transport: Box<dyn EmailTransport>) -> Self {
        Self {
            transport,
            last_sent: None,
            pending: None,
        }
    }

    /// Handle a freshly detected change. Outside a cooldown the change is
    /// sent as-is and any queued slot is discarded; inside a cooldown the
    /// change is merged into the slot (earliest baseline kept, latest output
    /// overwritten).
    pub fn notify(&mut self, change: ChangeNotification) -> Outcome {
        if let Some(remaining) = self.cooldown_remaining(change.cooldown) {
            match &mut self.pending {
                Some(pending) => pending.new_output = change.new_output,
                None => self.pending = Some(change),
            }
            let secs = remaining.as_millis().div_ceil(1000);
            return Outcome::skipped(format!(
                "Cooldown active ({}s remaining), change queued",
                secs
            ));
        }

        // The slot is superseded by the change we were just handed.
        self.pending = None;
        self.send(&change)
    }

    /// Deliver the queued change if its cooldown has lapsed. The slot stays
    /// intact while the cooldown is still running.
    pub fn flush_pending(&mut self) -> Outcome {
        let Some(pending) = self.pending.take() else {
            return Outcome::skipped("No pending changes");
        };

        if self.cooldown_remaining(pending.cooldown).is_some() {
            self.pending = Some(pending);
            return Outcome::skipped("Cooldown still active");
        }

        self.send(&pending)
    }

    fn cooldown_remaining(&self, cooldown: Duration) -> Option<Duration> {
        let elapsed = self.last_sent?.elapsed();
        if elapsed >= cooldown {
            None
        } else {
            Some(cooldown - elapsed)
        }
    }

    fn send(&mut self, change: &ChangeNotification) -> Outcome {
        let patch = diff::unified_diff(&change.old_output, &change.new_output, &change.command);
        let message = EmailMessage {
            to: change.to.clone(),
            from: change.from.clone(),
            subject: change.subject.clone(),
            html: build_html_body(&change.command, &patch),
            text: patch,
        };

        match self.transport.send(&message) {
            Ok(()) => {
                self.last_sent = Some(Instant::now());
                Outcome::sent()
            }
            Err(err) => {
                let reason = err.to_string();
                eprintln!("watchmail: email error: {}", reason);
                Outcome::skipped(reason)
            }
        }
    }
}

fn build_html_body(command: &str, patch: &str) -> String {
    format!(
        "<h2 style=\"font-family:sans-serif;margin:0 0 16px\">Change detected</h2>\n\
         <p style=\"font-family:sans-serif;color:#586069;margin:0 0 16px\">\
         Command: <code>{}</code></p>\n\
         {}\n\
         <p style=\"font-family:sans-serif;color:#586069;font-size:12px;margin:16px 0 0\">\
         Sent by watchmail</p>",
        diff::escape_html(command),
        diff::diff_to_html(patch),
    )
}

/// Run the notifier on its own thread, fed by the watch loop over `rx`.
/// Sends are fire-and-forget from the loop's point of view; on idle ticks
/// the worker flushes a queued change whose cooldown has lapsed.
pub fn spawn_notifier_worker(
    mut notifier: Notifier,
    rx: Receiver<ChangeNotification>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("notifier-worker".to_string())
        .spawn(move || {
            loop {
                match rx.recv_timeout(FLUSH_TICK) {
                    Ok(change) => {
                        let _ = notifier.notify(change);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        let _ = notifier.flush_pending();
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })
}
