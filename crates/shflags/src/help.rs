//! Usage text rendering.

use crate::registry::{FlagDefinition, FlagRegistry, HELP_FLAG, NEGATION_PREFIX};
use crate::value::FlagType;

/// Render the usage message for every registered flag, in definition order.
///
/// ```text
/// USAGE: greet [flags] args
/// flags:
///   -h,--help:  show this help (default: false)
///   -x,--[no]update:  update things (default: false)
///   -n,--name:  who to greet (default: 'world')
/// ```
pub fn render_help(registry: &FlagRegistry) -> String {
    let settings = registry.settings();
    let mut out = match &settings.help {
        Some(header) => format!("{}\n", header.trim_end()),
        None => format!("USAGE: {} [flags] args\n", settings.parent_name()),
    };
    if registry.is_empty() {
        return out;
    }

    out.push_str("flags:\n");
    for def in registry.flags() {
        let flag = flag_column(def);
        let default = format!("(default: {})", def.default_value().help_display());
        let help = def.help().trim();

        let line = if help.is_empty() {
            format!("  {flag}  {default}")
        } else {
            format!("  {flag}  {help} {default}")
        };
        if line.chars().count() < settings.columns {
            out.push_str(&line);
            out.push('\n');
            continue;
        }

        // Too wide: default goes on its own line, aligned under the help text.
        out.push_str(format!("  {flag}  {help}").trim_end());
        out.push('\n');
        let pad = " ".repeat(flag.chars().count());
        out.push_str(&format!("  {pad}  {default}\n"));
    }
    out
}

fn flag_column(def: &FlagDefinition) -> String {
    let mut s = String::new();
    if let Some(short) = def.short_name() {
        s.push('-');
        s.push(short);
        s.push(',');
    }
    s.push_str("--");
    if def.flag_type() == FlagType::Boolean && def.key() != HELP_FLAG {
        s.push_str(&format!("[{NEGATION_PREFIX}]"));
    }
    s.push_str(def.long_name());
    s.push(':');
    s
}

impl FlagRegistry {
    pub fn usage(&self) -> String {
        render_help(self)
    }

    /// Write the usage message to stderr.
    pub fn print_help(&self) {
        eprint!("{}", self.usage());
    }
}
