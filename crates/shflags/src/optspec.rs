//! getopt option strings derived from the registry.

use crate::registry::FlagRegistry;

/// A single option known to the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongOption {
    pub name: String,
    pub takes_value: bool,
}

/// Short and long option specs in the format accepted by `getopt -o/-l`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    /// e.g. `hxc:` (a trailing `:` marks a required value).
    pub short: String,
    /// e.g. `help,update,count:`.
    pub long: String,
    /// Negation aliases of boolean flags, e.g. `nohelp,noupdate`.
    pub negations: Vec<String>,
}

impl OptionSpec {
    pub fn from_registry(registry: &FlagRegistry) -> Self {
        let mut short = String::new();
        let mut long: Vec<String> = Vec::new();
        let mut negations = Vec::new();

        for def in registry.flags() {
            let suffix = if def.flag_type().takes_value() { ":" } else { "" };
            if let Some(s) = def.short_name() {
                short.push(s);
                short.push_str(suffix);
            }
            long.push(format!("{}{suffix}", def.long_name()));
            if let Some(n) = def.negation() {
                negations.push(n);
            }
        }

        Self {
            short,
            long: long.join(","),
            negations,
        }
    }

    /// Long options plus negation aliases, as handed to `getopt -l`.
    pub fn long_with_negations(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.long.is_empty() {
            parts.push(self.long.as_str());
        }
        parts.extend(self.negations.iter().map(String::as_str));
        parts.join(",")
    }

    /// Whether short option `c` is known, and if so whether it takes a value.
    pub fn short_option(&self, c: char) -> Option<bool> {
        let mut chars = self.short.chars().peekable();
        while let Some(cur) = chars.next() {
            let takes_value = chars.next_if_eq(&':').is_some();
            if cur == c {
                return Some(takes_value);
            }
        }
        None
    }

    /// Every long option, negation aliases included, in spec order.
    pub fn long_options(&self) -> Vec<LongOption> {
        self.long_with_negations()
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_suffix(':') {
                Some(name) => LongOption {
                    name: name.to_string(),
                    takes_value: true,
                },
                None => LongOption {
                    name: s.to_string(),
                    takes_value: false,
                },
            })
            .collect()
    }
}
