use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use tokio::sync::Notify;

use shardsweep::exec::{ExecutorBackend, ExitReport, Invocation, InvocationKind};

type Matcher = Arc<dyn Fn(&Invocation) -> bool + Send + Sync>;

enum Rule {
    /// Exit with this code.
    Exit(Matcher, i32),
    /// Fail to start.
    SpawnError(Matcher),
    /// Block until a `Kill` invocation arrives, then report a signal.
    UntilKilled(Matcher),
}

/// A fake executor backend that:
/// - records every invocation in arrival order
/// - succeeds immediately unless a rule says otherwise
///
/// Rules are checked in insertion order; the first match wins.
#[derive(Default)]
pub struct FakeBackend {
    invocations: Mutex<Vec<Invocation>>,
    rules: Mutex<Vec<Rule>>,
    killed: Notify,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn exit_with<F>(&self, code: i32, matcher: F)
    where
        F: Fn(&Invocation) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Rule::Exit(Arc::new(matcher), code));
    }

    pub fn fail_to_spawn<F>(&self, matcher: F)
    where
        F: Fn(&Invocation) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Rule::SpawnError(Arc::new(matcher)));
    }

    pub fn run_until_killed<F>(&self, matcher: F)
    where
        F: Fn(&Invocation) -> bool + Send + Sync + 'static,
    {
        self.push_rule(Rule::UntilKilled(Arc::new(matcher)));
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn of_kind(&self, kind: InvocationKind) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.kind == kind)
            .collect()
    }

    fn push_rule(&self, rule: Rule) {
        self.rules.lock().unwrap().push(rule);
    }

    fn matching_rule(&self, invocation: &Invocation) -> Option<Outcome> {
        let rules = self.rules.lock().unwrap();
        rules.iter().find_map(|rule| match rule {
            Rule::Exit(m, code) if m(invocation) => Some(Outcome::Exit(*code)),
            Rule::SpawnError(m) if m(invocation) => Some(Outcome::SpawnError),
            Rule::UntilKilled(m) if m(invocation) => Some(Outcome::UntilKilled),
            _ => None,
        })
    }
}

enum Outcome {
    Exit(i32),
    SpawnError,
    UntilKilled,
}

impl ExecutorBackend for FakeBackend {
    fn run(
        &self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ExitReport>> + Send + '_>> {
        Box::pin(async move {
            self.invocations.lock().unwrap().push(invocation.clone());

            if invocation.kind == InvocationKind::Kill {
                self.killed.notify_one();
            }

            match self.matching_rule(&invocation) {
                None => Ok(ExitReport::success()),
                Some(Outcome::Exit(code)) => Ok(ExitReport::exited(code)),
                Some(Outcome::SpawnError) => Err(anyhow!(
                    "spawning '{}': No such file or directory",
                    invocation.argv.first().map(String::as_str).unwrap_or("")
                )),
                Some(Outcome::UntilKilled) => {
                    self.killed.notified().await;
                    Ok(ExitReport::signalled())
                }
            }
        })
    }
}

/// Matcher helpers.
pub fn kind(k: InvocationKind) -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
    move |i| i.kind == k
}

/// Runs whose log file name starts with `prefix`.
pub fn run_logged_as(prefix: &str) -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
    let prefix = prefix.to_string();
    move |i| {
        i.kind == InvocationKind::Run
            && i.log_path
                .as_ref()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
    }
}

/// Invocations whose argv contains `arg` exactly.
pub fn has_arg(arg: &str) -> impl Fn(&Invocation) -> bool + Send + Sync + 'static {
    let arg = arg.to_string();
    move |i| i.argv.iter().any(|a| *a == arg)
}
