// src/exec/mod.rs

//! Process execution layer.
//!
//! Everything the sweep does to the outside world (building graphs, running
//! the engine, clearing checkpoint directories on the cluster, delivering the
//! fault kill) is expressed as an [`Invocation`] and handed to an
//! [`ExecutorBackend`].
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `ProcessBackend`; tests replace it with a fake that records invocations.
//! - [`process`] spawns one OS process with `tokio::process::Command` and
//!   waits for it.

pub mod backend;
pub mod process;

use std::fmt;
use std::path::PathBuf;

pub use backend::{ExecutorBackend, ProcessBackend};

/// What an invocation is for. Used for logging and by test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationKind {
    /// Distributed graph construction.
    Provision,
    /// A timed engine run.
    Run,
    /// Checkpoint directory maintenance through the cluster shell.
    Storage,
    /// Delayed fault-injection kill.
    Kill,
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvocationKind::Provision => "provision",
            InvocationKind::Run => "run",
            InvocationKind::Storage => "storage",
            InvocationKind::Kill => "kill",
        };
        f.write_str(s)
    }
}

/// One external command: program plus arguments, never a shell string.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub kind: InvocationKind,
    pub argv: Vec<String>,
    /// When set, stdout and stderr go to this file instead of the log stream.
    pub log_path: Option<PathBuf>,
}

impl Invocation {
    pub fn new(kind: InvocationKind, argv: Vec<String>) -> Self {
        Self {
            kind,
            argv,
            log_path: None,
        }
    }

    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// The command line, quoted so it can be pasted into a shell.
    pub fn display(&self) -> String {
        command_line(&self.argv)
    }
}

/// Join `argv` into one POSIX shell command line.
pub fn command_line(argv: &[String]) -> String {
    argv.iter()
        .map(|a| shell_quote(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Single-quote `s` for a POSIX shell.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=,:@%+^".contains(c))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitReport {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn signalled() -> Self {
        Self { code: None }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}
