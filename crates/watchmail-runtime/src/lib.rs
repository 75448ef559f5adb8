pub mod config;
pub mod exec;
pub mod notifier;
pub mod options;
pub mod render;
pub mod terminal;
pub mod transport;
pub mod watch;

pub use config::Config;
pub use exec::{ExecutionResult, run_command};
pub use notifier::{ChangeNotification, Notifier, Outcome, spawn_notifier_worker};
pub use options::{DiffMode, EmailSettings, WatchOptions};
pub use transport::{EmailMessage, EmailTransport, ResendTransport};
pub use watch::run_watch;
