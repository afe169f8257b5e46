#![allow(dead_code)]

pub use shardsweep_test_utils::{init_tracing, with_timeout};

use std::path::Path;

use shardsweep::exec::Invocation;

/// Value of `--flag=` in an invocation's argv, if present.
pub fn flag_value<'a>(inv: &'a Invocation, flag: &str) -> Option<&'a str> {
    let prefix = format!("{flag}=");
    inv.argv
        .iter()
        .find_map(|a| a.strip_prefix(prefix.as_str()))
}

/// File name of an invocation's log, if it has one.
pub fn log_file_name(inv: &Invocation) -> Option<String> {
    inv.log_path
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
}
