use crate::args::Cli;
use anyhow::{Context, Result, bail};
use std::sync::mpsc;
use std::time::Duration;
use watchmail_core::duration::parse_duration_ms;
use watchmail_runtime::config::Config;
use watchmail_runtime::notifier::{Notifier, spawn_notifier_worker};
use watchmail_runtime::options::{DiffMode, EmailSettings, WatchOptions};
use watchmail_runtime::transport::ResendTransport;
use watchmail_runtime::watch::run_watch;

/// Resolve options, wire up the notifier worker when email is configured,
/// and run the watch loop. Returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let config = Config::load()?;
    let opts = resolve_options(&cli, &config)?;

    let (notify_tx, _worker) = match &opts.email {
        Some(email) => {
            let transport = ResendTransport::new(email.api_key.clone());
            let notifier = Notifier::new(Box::new(transport));
            let (tx, rx) = mpsc::channel();
            let handle =
                spawn_notifier_worker(notifier, rx).context("failed to start notifier worker")?;
            (Some(tx), Some(handle))
        }
        None => (None, None),
    };

    run_watch(&opts, notify_tx)
}

/// Apply precedence (explicit flag > persisted default > built-in default)
/// and validate everything that must be caught before the loop starts.
fn resolve_options(cli: &Cli, config: &Config) -> Result<WatchOptions> {
    let interval_secs = cli.interval.or(config.default_interval).unwrap_or(2.0);
    if !interval_secs.is_finite() || interval_secs < 0.0 {
        bail!("interval must be a non-negative number of seconds");
    }

    let differences = match cli.differences.as_deref() {
        None => DiffMode::Off,
        Some("permanent") | Some("cumulative") => DiffMode::Accumulate,
        Some(_) => DiffMode::Transient,
    };

    // The cooldown literal is validated whenever it is supplied, even if no
    // email is configured on this run.
    let cooldown_literal = cli
        .cooldown
        .clone()
        .or_else(|| config.default_cooldown.clone())
        .unwrap_or_else(|| "1m".to_string());
    let cooldown = Duration::from_millis(parse_duration_ms(&cooldown_literal)?);

    let to = cli
        .email
        .clone()
        .or_else(|| cli.to.clone())
        .or_else(|| config.default_to.clone());

    let email = match to {
        Some(to) => {
            let api_key = cli
                .api_key
                .clone()
                .or_else(|| std::env::var("RESEND_API_KEY").ok())
                .or_else(|| config.api_key.clone());
            let Some(api_key) = api_key else {
                bail!(
                    "email notification requires a Resend API key; \
                     set RESEND_API_KEY, pass --api-key, or add api_key to the config file"
                );
            };

            let Some(from) = cli.from.clone().or_else(|| config.default_from.clone()) else {
                bail!(
                    "email notification requires a sender address; \
                     pass --from or add default_from to the config file"
                );
            };

            Some(EmailSettings {
                to,
                from,
                subject: cli.subject.clone(),
                api_key,
                cooldown,
            })
        }
        None => None,
    };

    Ok(WatchOptions {
        command: cli.command.clone(),
        interval_secs,
        differences,
        errexit: cli.errexit,
        chgexit: cli.chgexit,
        color: cli.color,
        no_color: cli.no_color,
        no_title: cli.no_title,
        no_wrap: cli.no_wrap,
        exec: cli.exec,
        precise: cli.precise,
        beep: cli.beep,
        email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("watchmail").chain(args.iter().copied()))
    }

    #[test]
    fn test_built_in_defaults() {
        let cli = parse(&["uptime"]);
        let opts = resolve_options(&cli, &Config::default()).unwrap();

        assert_eq!(opts.command, vec!["uptime"]);
        assert_eq!(opts.interval_secs, 2.0);
        assert_eq!(opts.differences, DiffMode::Off);
        assert!(opts.email.is_none());
    }

    #[test]
    fn test_flag_overrides_persisted_default() {
        let cli = parse(&["-n", "5", "uptime"]);
        let config = Config {
            default_interval: Some(30.0),
            ..Config::default()
        };
        let opts = resolve_options(&cli, &config).unwrap();
        assert_eq!(opts.interval_secs, 5.0);
    }

    #[test]
    fn test_persisted_default_overrides_built_in() {
        let cli = parse(&["uptime"]);
        let config = Config {
            default_interval: Some(30.0),
            ..Config::default()
        };
        let opts = resolve_options(&cli, &config).unwrap();
        assert_eq!(opts.interval_secs, 30.0);
    }

    #[test]
    fn test_differences_modes() {
        let cli = parse(&["-d", "uptime"]);
        let opts = resolve_options(&cli, &Config::default()).unwrap();
        assert_eq!(opts.differences, DiffMode::Transient);

        let cli = parse(&["-d=permanent", "uptime"]);
        let opts = resolve_options(&cli, &Config::default()).unwrap();
        assert_eq!(opts.differences, DiffMode::Accumulate);

        let cli = parse(&["--differences=cumulative", "uptime"]);
        let opts = resolve_options(&cli, &Config::default()).unwrap();
        assert_eq!(opts.differences, DiffMode::Accumulate);
    }

    #[test]
    fn test_to_is_an_alias_for_email() {
        let cli = parse(&[
            "--to",
            "ops@example.com",
            "--from",
            "watch@example.com",
            "--api-key",
            "re_key",
            "uptime",
        ]);
        let opts = resolve_options(&cli, &Config::default()).unwrap();
        assert_eq!(opts.email.unwrap().to, "ops@example.com");
    }

    #[test]
    fn test_email_requires_sender_address() {
        let cli = parse(&["--email", "ops@example.com", "--api-key", "re_key", "uptime"]);
        let err = resolve_options(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("sender address"));
    }

    #[test]
    fn test_email_settings_come_from_config_file() {
        let cli = parse(&["uptime"]);
        let config = Config {
            api_key: Some("re_key".to_string()),
            default_to: Some("ops@example.com".to_string()),
            default_from: Some("watch@example.com".to_string()),
            default_cooldown: Some("30s".to_string()),
            default_interval: None,
        };
        let opts = resolve_options(&cli, &config).unwrap();

        let email = opts.email.unwrap();
        assert_eq!(email.to, "ops@example.com");
        assert_eq!(email.from, "watch@example.com");
        assert_eq!(email.cooldown, Duration::from_secs(30));
    }

    #[test]
    fn test_cooldown_defaults_to_one_minute() {
        let cli = parse(&[
            "--email",
            "ops@example.com",
            "--from",
            "watch@example.com",
            "--api-key",
            "re_key",
            "uptime",
        ]);
        let opts = resolve_options(&cli, &Config::default()).unwrap();
        assert_eq!(opts.email.unwrap().cooldown, Duration::from_secs(60));
    }

    #[test]
    fn test_bad_cooldown_is_fatal_even_without_email() {
        let cli = parse(&["--cooldown", "5x", "uptime"]);
        let err = resolve_options(&cli, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid duration"));
        assert!(err.to_string().contains("5x"));
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        let cli = parse(&["-n", "-3", "uptime"]);
        assert!(resolve_options(&cli, &Config::default()).is_err());
    }

    #[test]
    fn test_flags_after_command_belong_to_the_command() {
        let cli = parse(&["ls", "-la"]);
        assert_eq!(cli.command, vec!["ls", "-la"]);
    }
}
