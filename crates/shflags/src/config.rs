//! Environment-driven settings.

pub const GETOPT_CMD_ENV: &str = "FLAGS_GETOPT_CMD";
pub const PARENT_ENV: &str = "FLAGS_PARENT";
pub const HELP_ENV: &str = "FLAGS_HELP";
pub const COLUMNS_ENV: &str = "COLUMNS";

pub const DEFAULT_GETOPT_CMD: &str = "getopt";
pub const DEFAULT_COLUMNS: usize = 80;

/// Which tokenizer `FlagRegistry::parse` uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerChoice {
    /// In-process getopt reimplementation.
    Builtin,
    /// Shell out to the named getopt(1) command.
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tokenizer: TokenizerChoice,
    /// Program name shown in the default usage header.
    pub parent: Option<String>,
    /// Full usage header replacing `USAGE: <parent> [flags] args`.
    pub help: Option<String>,
    /// Terminal width used to wrap help lines.
    pub columns: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerChoice::Builtin,
            parent: None,
            help: None,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (used by tests and hosts
    /// that keep their own environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tokenizer = match non_empty(GETOPT_CMD_ENV) {
            Some(cmd) => TokenizerChoice::Command(cmd.trim().to_string()),
            None => TokenizerChoice::Builtin,
        };
        let columns = non_empty(COLUMNS_ENV)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|c| *c > 0)
            .unwrap_or(DEFAULT_COLUMNS);

        Self {
            tokenizer,
            parent: non_empty(PARENT_ENV),
            help: non_empty(HELP_ENV),
            columns,
        }
    }

    pub fn with_getopt_command(mut self, cmd: impl Into<String>) -> Self {
        self.tokenizer = TokenizerChoice::Command(cmd.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Program name for the usage header, falling back to argv[0].
    pub fn parent_name(&self) -> String {
        if let Some(p) = &self.parent {
            return p.clone();
        }
        std::env::args()
            .next()
            .map(|a| {
                std::path::Path::new(&a)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(a)
            })
            .unwrap_or_else(|| "program".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let s = Settings::from_lookup(lookup(&[]));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn env_overrides() {
        let s = Settings::from_lookup(lookup(&[
            (GETOPT_CMD_ENV, "/usr/local/bin/getopt"),
            (PARENT_ENV, "deploy.sh"),
            (HELP_ENV, "usage: deploy.sh [flags] host"),
            (COLUMNS_ENV, "120"),
        ]));
        assert_eq!(
            s.tokenizer,
            TokenizerChoice::Command("/usr/local/bin/getopt".to_string())
        );
        assert_eq!(s.parent_name(), "deploy.sh");
        assert_eq!(s.help.as_deref(), Some("usage: deploy.sh [flags] host"));
        assert_eq!(s.columns, 120);
    }

    #[test]
    fn bad_columns_fall_back() {
        let s = Settings::from_lookup(lookup(&[(COLUMNS_ENV, "wide"), (GETOPT_CMD_ENV, "  ")]));
        assert_eq!(s.columns, DEFAULT_COLUMNS);
        assert_eq!(s.tokenizer, TokenizerChoice::Builtin);
    }
}
