use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use shflags::{DefineError, FlagRegistry, FlagType, Settings, Status};

pub const DEFAULT_MANIFEST_NAME: &str = "flags.json";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Flag definitions for one script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,

    /// Program name used in the usage header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Usage header replacing `USAGE: <parent> [flags] args`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub flag_type: FlagType,
    pub default: DefaultLiteral,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
}

/// A default as written in JSON (`false`, `5`, `"world"`), validated by the
/// registry against the flag type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultLiteral {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl DefaultLiteral {
    pub fn literal(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// A definition rejected by the registry.
#[derive(Debug, Clone)]
pub struct Rejected {
    pub name: String,
    pub error: DefineError,
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest JSON: {}", path.display()))?;

        if let Some(v) = manifest.schema_version {
            if v != MANIFEST_SCHEMA_VERSION {
                bail!(
                    "unsupported manifest schemaVersion {v} (expected {MANIFEST_SCHEMA_VERSION})"
                );
            }
        }
        Ok(manifest)
    }

    /// Overlay the manifest's `parent`/`help` on top of `settings`.
    pub fn settings(&self, mut settings: Settings) -> Settings {
        if let Some(parent) = &self.parent {
            settings = settings.with_parent(parent.clone());
        }
        if let Some(help) = &self.help {
            settings = settings.with_help(help.clone());
        }
        settings
    }

    /// Define every flag, returning the definitions the registry rejected.
    pub fn define_all(&self, registry: &mut FlagRegistry) -> Vec<Rejected> {
        let mut rejected = Vec::new();
        for entry in &self.flags {
            let result = registry.define(
                entry.flag_type,
                &entry.name,
                &entry.default.literal(),
                &entry.help,
                entry.short,
            );
            if let Err(error) = result {
                rejected.push(Rejected {
                    name: entry.name.clone(),
                    error,
                });
            }
        }
        rejected
    }

    /// Build a registry, failing on the first fatal definition error.
    /// Duplicate names only warn.
    pub fn build_registry(&self, settings: Settings) -> Result<FlagRegistry> {
        let mut registry = FlagRegistry::with_settings(self.settings(settings));
        let rejected = self.define_all(&mut registry);
        if let Some(fatal) = rejected.into_iter().find(|r| r.error.status() == Status::Error) {
            return Err(fatal.error)
                .with_context(|| format!("failed to define flag '{}'", fatal.name));
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("shflags-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const SAMPLE: &str = r#"{
  "schemaVersion": 1,
  "parent": "greet.sh",
  "flags": [
    { "name": "update", "type": "boolean", "default": false, "help": "update things", "short": "x" },
    { "name": "count", "type": "integer", "default": 5 },
    { "name": "name", "type": "string", "default": "world", "short": "n" }
  ]
}"#;

    #[test]
    fn manifest_deserializes_camel_case() {
        let m: Manifest = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(m.schema_version, Some(1));
        assert_eq!(m.parent.as_deref(), Some("greet.sh"));
        assert_eq!(m.flags.len(), 3);
        assert_eq!(m.flags[0].flag_type, FlagType::Boolean);
        assert_eq!(m.flags[0].default, DefaultLiteral::Bool(false));
        assert_eq!(m.flags[0].short, Some('x'));
        assert_eq!(m.flags[1].default.literal(), "5");
        assert_eq!(m.flags[1].short, None);
        assert_eq!(m.flags[2].default, DefaultLiteral::Text("world".to_string()));
    }

    #[test]
    fn build_registry_defines_flags_in_order() {
        let m: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let registry = m.build_registry(Settings::default()).unwrap();
        let names: Vec<&str> = registry.flags().map(|f| f.long_name()).collect();
        assert_eq!(names, vec!["help", "update", "count", "name"]);
        assert_eq!(registry.settings().parent.as_deref(), Some("greet.sh"));
        assert_eq!(registry.get_int("count"), Some(5));
    }

    #[test]
    fn duplicates_warn_but_bad_defaults_fail() {
        let mut m: Manifest = serde_json::from_str(SAMPLE).unwrap();
        m.flags.push(FlagEntry {
            name: "count".to_string(),
            flag_type: FlagType::Integer,
            default: DefaultLiteral::Int(9),
            help: String::new(),
            short: None,
        });
        let registry = m.build_registry(Settings::default()).unwrap();
        assert_eq!(registry.get_int("count"), Some(5));

        m.flags.push(FlagEntry {
            name: "jobs".to_string(),
            flag_type: FlagType::Integer,
            default: DefaultLiteral::Text("many".to_string()),
            help: String::new(),
            short: None,
        });
        let err = m.build_registry(Settings::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to define flag 'jobs'"));
    }

    #[test]
    fn from_file_rejects_unknown_schema() {
        let dir = make_temp_dir("manifest-schema");
        let path = dir.join(DEFAULT_MANIFEST_NAME);
        fs::write(&path, r#"{ "schemaVersion": 2, "flags": [] }"#).unwrap();
        let err = Manifest::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("schemaVersion 2"));

        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(Manifest::from_file(&path).unwrap().flags.len(), 3);
        let _ = fs::remove_dir_all(&dir);
    }
}
