use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;

use shflags::{FlagRegistry, FlagValue, Status};

/// Render parse results as `eval`-able POSIX shell.
///
/// Booleans use shell truth values (`0` true, `1` false). `FLAGS_ARGV` holds
/// the quoted positional list, and a trailing `set --` replaces the caller's
/// positional parameters with it.
pub fn shell(registry: &FlagRegistry) -> String {
    let mut out = String::new();
    for def in registry.flags() {
        let Some(value) = registry.get(def.key()) else {
            continue;
        };
        let rendered = match value {
            FlagValue::Boolean(b) => Status::from_bool(*b).to_string(),
            FlagValue::Integer(i) => i.to_string(),
            FlagValue::String(s) => shell_quote(s),
        };
        let _ = writeln!(out, "{}={rendered}", def.variable_name());
    }

    let argv = quoted_list(registry.positional_arguments());
    let _ = writeln!(out, "FLAGS_ARGC={}", registry.argc());
    let _ = writeln!(out, "FLAGS_ARGV={}", shell_quote(&argv));
    if argv.is_empty() {
        out.push_str("set --\n");
    } else {
        let _ = writeln!(out, "set -- {argv}");
    }
    out
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    flags: &'a IndexMap<String, FlagValue>,
    positional: &'a [String],
    argc: usize,
}

pub fn json(registry: &FlagRegistry) -> Result<String> {
    let report = Report {
        flags: registry.values(),
        positional: registry.positional_arguments(),
        argc: registry.argc(),
    };
    let mut out =
        serde_json::to_string_pretty(&report).context("failed to serialize parse result")?;
    out.push('\n');
    Ok(out)
}

pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| shell_quote(s))
        .collect::<Vec<_>>()
        .join(" ")
}
