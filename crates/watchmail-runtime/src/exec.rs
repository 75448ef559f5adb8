//! One-shot execution of the monitored command.

use std::process::Command;
use std::time::{Duration, Instant};

/// Output captured from a single run of the monitored command. Built fresh
/// each iteration and owned by it.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

/// Run the command once, blocking until it exits. Shell mode joins the
/// tokens and hands them to `sh -c`; exec mode runs the token list directly
/// as program plus arguments.
///
/// A spawn failure is never fatal to the caller: it is reported through
/// `stderr` with exit code 127 so the loop treats it like any other failing
/// command.
pub fn run_command(tokens: &[String], exec_mode: bool) -> ExecutionResult {
    let start = Instant::now();

    let output = if exec_mode {
        match tokens.split_first() {
            Some((program, args)) => Command::new(program).args(args).output(),
            None => {
                return spawn_failure("no command given".to_string(), start);
            }
        }
    } else {
        Command::new("sh").arg("-c").arg(tokens.join(" ")).output()
    };

    match output {
        Ok(out) => ExecutionResult {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            exit_code: out.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        },
        Err(err) => spawn_failure(format!("failed to run command: {}", err), start),
    }
}

fn spawn_failure(message: String, start: Instant) -> ExecutionResult {
    ExecutionResult {
        stdout: String::new(),
        stderr: format!("watchmail: {}", message),
        exit_code: 127,
        duration: start.elapsed(),
    }
}
