//! Flag definitions and the registry that owns them.
//!
//! A [`FlagRegistry`] stores every declared flag in definition order together
//! with the name indexes used for collision checks and short-name lookup, and
//! the output values produced by parsing.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use crate::config::Settings;
use crate::error::{DefineError, DefineResult};
use crate::value::{FlagType, FlagValue};

/// Names a host may not define (compared against the uppercased key).
pub const RESERVED_NAMES: &[&str] = &[
    "ARGC",
    "ARGV",
    "ERROR",
    "FALSE",
    "GETOPT_CMD",
    "HELP",
    "PARENT",
    "TRUE",
    "VERSION",
];

pub const HELP_FLAG: &str = "help";
pub const HELP_SHORT: char = 'h';
const HELP_TEXT: &str = "show this help";

/// Prefix of the implicit negation alias registered for boolean flags.
pub const NEGATION_PREFIX: &str = "no";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDefinition {
    long_name: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_name: Option<char>,
    #[serde(rename = "type")]
    flag_type: FlagType,
    default: FlagValue,
    help: String,
}

impl FlagDefinition {
    /// Name as declared, used on the command line (`--dry-run`).
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Long name with dashes replaced by underscores (`dry_run`).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn flag_type(&self) -> FlagType {
        self.flag_type
    }

    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// `no<long_name>` for boolean flags.
    pub fn negation(&self) -> Option<String> {
        (self.flag_type == FlagType::Boolean)
            .then(|| format!("{NEGATION_PREFIX}{}", self.long_name))
    }

    /// Name of the shell variable holding this flag's value.
    pub fn variable_name(&self) -> String {
        format!("FLAGS_{}", self.key)
    }
}

/// Normalize a long name into its key (dashes become underscores).
pub fn normalize_name(name: &str) -> String {
    name.replace('-', "_")
}

pub fn is_reserved(name: &str) -> bool {
    let upper = normalize_name(name).to_ascii_uppercase();
    RESERVED_NAMES.contains(&upper.as_str())
}

#[derive(Debug, Clone)]
pub struct FlagRegistry {
    flags: IndexMap<String, FlagDefinition>,
    /// Keys plus the normalized negation aliases of boolean flags.
    defined_names: HashSet<String>,
    short_index: HashMap<char, String>,
    values: IndexMap<String, FlagValue>,
    positional: Vec<String>,
    argc: usize,
    settings: Settings,
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagRegistry {
    /// An empty registry (apart from the built-in `help` flag) with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// A registry configured from `FLAGS_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_settings(Settings::from_env())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let mut registry = Self {
            flags: IndexMap::new(),
            defined_names: HashSet::new(),
            short_index: HashMap::new(),
            values: IndexMap::new(),
            positional: Vec::new(),
            argc: 0,
            settings,
        };
        registry.define_builtin_help();
        registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn define_boolean(
        &mut self,
        long_name: &str,
        default: impl Display,
        help: &str,
        short_name: Option<char>,
    ) -> DefineResult<()> {
        self.define(FlagType::Boolean, long_name, &default.to_string(), help, short_name)
    }

    pub fn define_integer(
        &mut self,
        long_name: &str,
        default: impl Display,
        help: &str,
        short_name: Option<char>,
    ) -> DefineResult<()> {
        self.define(FlagType::Integer, long_name, &default.to_string(), help, short_name)
    }

    pub fn define_string(
        &mut self,
        long_name: &str,
        default: impl Display,
        help: &str,
        short_name: Option<char>,
    ) -> DefineResult<()> {
        self.define(FlagType::String, long_name, &default.to_string(), help, short_name)
    }

    /// Register a flag.
    ///
    /// Duplicate long or short names are reported with [`Status::False`]
    /// and logged as warnings; the first definition stays authoritative.
    ///
    /// [`Status::False`]: crate::Status::False
    pub fn define(
        &mut self,
        flag_type: FlagType,
        long_name: &str,
        default: &str,
        help: &str,
        short_name: Option<char>,
    ) -> DefineResult<()> {
        let result = self.try_define(flag_type, long_name, default, help, short_name);
        if let Err(err) = &result {
            if err.status() == crate::Status::False {
                tracing::warn!("{err}");
            }
        }
        result
    }

    fn try_define(
        &mut self,
        flag_type: FlagType,
        long_name: &str,
        default: &str,
        help: &str,
        short_name: Option<char>,
    ) -> DefineResult<()> {
        validate_long_name(long_name)?;
        if let Some(short) = short_name {
            validate_short_name(short)?;
        }
        if is_reserved(long_name) {
            return Err(DefineError::Reserved(long_name.to_string()));
        }

        let key = normalize_name(long_name);
        self.check_collisions(flag_type, long_name, &key, short_name)?;

        let default = FlagValue::coerce(flag_type, default).ok_or_else(|| {
            DefineError::InvalidDefault {
                name: long_name.to_string(),
                flag_type,
                value: default.to_string(),
            }
        })?;

        tracing::debug!(flag = long_name, %flag_type, "defined flag");
        self.insert(FlagDefinition {
            long_name: long_name.to_string(),
            key,
            short_name,
            flag_type,
            default,
            help: help.to_string(),
        });
        Ok(())
    }

    fn check_collisions(
        &self,
        flag_type: FlagType,
        long_name: &str,
        key: &str,
        short_name: Option<char>,
    ) -> DefineResult<()> {
        let negation_taken = flag_type == FlagType::Boolean
            && self
                .defined_names
                .contains(&format!("{NEGATION_PREFIX}{key}"));
        if self.defined_names.contains(key) || negation_taken {
            let shown = if flag_type == FlagType::Boolean {
                format!("[{NEGATION_PREFIX}]{long_name}")
            } else {
                long_name.to_string()
            };
            return Err(DefineError::Duplicate(shown));
        }

        if let Some(short) = short_name {
            if let Some(existing) = self.flag_by_short(short) {
                return Err(DefineError::DuplicateShort {
                    short,
                    existing: existing.long_name.clone(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, def: FlagDefinition) {
        self.defined_names.insert(def.key.clone());
        if let Some(negation) = def.negation() {
            self.defined_names.insert(normalize_name(&negation));
        }
        if let Some(short) = def.short_name {
            self.short_index.insert(short, def.key.clone());
        }
        self.values.insert(def.key.clone(), def.default.clone());
        self.flags.insert(def.key.clone(), def);
    }

    fn define_builtin_help(&mut self) {
        self.insert(FlagDefinition {
            long_name: HELP_FLAG.to_string(),
            key: HELP_FLAG.to_string(),
            short_name: Some(HELP_SHORT),
            flag_type: FlagType::Boolean,
            default: FlagValue::Boolean(false),
            help: HELP_TEXT.to_string(),
        });
    }

    /// Drop every definition and parse result, returning to the freshly
    /// constructed state.
    pub fn reset(&mut self) {
        self.flags.clear();
        self.defined_names.clear();
        self.short_index.clear();
        self.values.clear();
        self.positional.clear();
        self.argc = 0;
        self.define_builtin_help();
        tracing::debug!("flag registry reset");
    }

    /// Look up a definition by long name or key.
    pub fn flag(&self, name: &str) -> Option<&FlagDefinition> {
        self.flags.get(&normalize_name(name))
    }

    /// Exact long-name lookup, as used for `--name` tokens.
    pub fn flag_by_long(&self, long_name: &str) -> Option<&FlagDefinition> {
        self.flags
            .get(&normalize_name(long_name))
            .filter(|f| f.long_name == long_name)
    }

    /// Resolve a `no<name>` alias to its boolean flag.
    pub fn flag_by_negation(&self, alias: &str) -> Option<&FlagDefinition> {
        let name = alias.strip_prefix(NEGATION_PREFIX)?;
        self.flag_by_long(name)
            .filter(|f| f.flag_type == FlagType::Boolean)
    }

    pub fn flag_by_short(&self, short: char) -> Option<&FlagDefinition> {
        self.short_index.get(&short).and_then(|key| self.flags.get(key))
    }

    /// Definitions in definition order.
    pub fn flags(&self) -> impl Iterator<Item = &FlagDefinition> {
        self.flags.values()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Current value of a flag (default until parsed).
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(&normalize_name(name))
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FlagValue::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FlagValue::as_int)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FlagValue::as_str)
    }

    /// All current values keyed by flag key, in definition order.
    pub fn values(&self) -> &IndexMap<String, FlagValue> {
        &self.values
    }

    pub fn positional_arguments(&self) -> &[String] {
        &self.positional
    }

    /// Number of argv tokens consumed by flags in the last parse.
    pub fn argc(&self) -> usize {
        self.argc
    }

    pub(crate) fn set_value(&mut self, key: &str, value: FlagValue) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = value;
        }
    }

    pub(crate) fn begin_parse(&mut self) {
        self.positional.clear();
        self.argc = 0;
    }

    pub(crate) fn push_positional(&mut self, value: String) {
        self.positional.push(value);
    }

    pub(crate) fn set_argc(&mut self, argc: usize) {
        self.argc = argc;
    }
}

fn validate_long_name(name: &str) -> DefineResult<()> {
    if name.is_empty() {
        return Err(DefineError::Invalid("long name must not be empty".to_string()));
    }
    if name.starts_with('-') {
        return Err(DefineError::Invalid(format!(
            "long name ({name}) must not start with '-'"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(DefineError::Invalid(format!(
            "long name ({name}) contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

fn validate_short_name(short: char) -> DefineResult<()> {
    // `:` and `?` carry meaning in getopt option strings.
    if !short.is_ascii_graphic() || matches!(short, '-' | ':' | '?') {
        return Err(DefineError::Invalid(format!(
            "short name ({short}) must be a single printable character"
        )));
    }
    Ok(())
}
