use std::time::Duration;

/// How changed lines are emphasized during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    Off,
    /// Highlight only the lines that changed this iteration.
    Transient,
    /// Once a line has changed, keep it highlighted for the rest of the run.
    Accumulate,
}

/// Email notification settings, present only when notification is enabled
/// and validated.
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub to: String,
    pub from: String,
    pub subject: Option<String>,
    pub api_key: String,
    pub cooldown: Duration,
}

/// Fully resolved run configuration. Precedence was already applied by the
/// caller: explicit flag > persisted default > built-in default.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub command: Vec<String>,
    pub interval_secs: f64,
    pub differences: DiffMode,
    pub errexit: bool,
    pub chgexit: bool,
    pub color: bool,
    pub no_color: bool,
    pub no_title: bool,
    pub no_wrap: bool,
    pub exec: bool,
    pub precise: bool,
    pub beep: bool,
    pub email: Option<EmailSettings>,
}
