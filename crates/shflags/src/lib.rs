//! Typed command-line flags with getopt-style parsing.
//!
//! Define boolean, integer and string flags on a [`FlagRegistry`], parse an
//! argument vector, then read the values and the remaining positional
//! arguments back:
//!
//! ```
//! use shflags::FlagRegistry;
//!
//! let mut flags = FlagRegistry::new();
//! flags.define_string("name", "world", "who to greet", Some('n')).unwrap();
//! flags.define_boolean("loud", false, "shout the greeting", Some('l')).unwrap();
//!
//! flags.parse(&["-l", "--name", "Kate", "--", "extra"]).unwrap();
//! assert_eq!(flags.get_str("name"), Some("Kate"));
//! assert_eq!(flags.get_bool("loud"), Some(true));
//! assert_eq!(flags.positional_arguments(), ["extra"]);
//! ```
//!
//! Boolean flags also accept a `--no<name>` form. A short boolean flag always
//! sets the inverse of its *default*, so repeating it has no further effect.

pub mod config;
pub mod error;
pub mod help;
pub mod optspec;
mod parser;
pub mod registry;
mod status;
pub mod tokenizer;
pub mod value;

use std::sync::{LazyLock, Mutex, MutexGuard};

pub use config::Settings;
pub use error::{DefineError, DefineResult, ParseError, ParseResult};
pub use help::render_help;
pub use optspec::OptionSpec;
pub use registry::{FlagDefinition, FlagRegistry};
pub use status::Status;
pub use tokenizer::{GetoptCommand, PosixTokenizer, Tokenizer};
pub use value::{FlagType, FlagValue, valid_boolean, valid_integer};

static GLOBAL: LazyLock<Mutex<FlagRegistry>> =
    LazyLock::new(|| Mutex::new(FlagRegistry::from_env()));

/// The process-wide default registry, configured from the environment on
/// first use.
///
/// Most programs only ever need one registry; libraries and tests should
/// prefer owning a [`FlagRegistry`].
pub fn global() -> MutexGuard<'static, FlagRegistry> {
    GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
