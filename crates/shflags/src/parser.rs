//! Walks a normalized token stream and applies it to the registry.

use crate::config::TokenizerChoice;
use crate::error::{ParseError, ParseResult};
use crate::optspec::OptionSpec;
use crate::registry::{FlagRegistry, HELP_FLAG};
use crate::tokenizer::{GetoptCommand, PosixTokenizer, SEPARATOR, Tokenizer};
use crate::value::{FlagType, FlagValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ScanningOptions,
    CollectingPositionals,
}

/// How a token named its flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Long,
    Negated,
    Short,
}

#[derive(Debug)]
struct Resolved {
    key: String,
    flag_type: FlagType,
    default: FlagValue,
    form: Form,
}

impl FlagRegistry {
    /// Parse `argv` (without the program name) with the configured tokenizer.
    ///
    /// On success every flag value and the positional list are updated. Errors
    /// abort immediately; values applied before the failing token are kept.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S]) -> ParseResult<()> {
        match self.settings().tokenizer.clone() {
            TokenizerChoice::Builtin => self.parse_with(&PosixTokenizer, argv),
            TokenizerChoice::Command(program) => {
                self.parse_with(&GetoptCommand::new(program), argv)
            }
        }
    }

    pub fn parse_with<T, S>(&mut self, tokenizer: &T, argv: &[S]) -> ParseResult<()>
    where
        T: Tokenizer + ?Sized,
        S: AsRef<str>,
    {
        let argv: Vec<String> = argv.iter().map(|a| a.as_ref().to_string()).collect();
        self.begin_parse();

        let spec = OptionSpec::from_registry(self);
        tracing::debug!(short = %spec.short, long = %spec.long_with_negations(), "option spec");
        let tokens = tokenizer.tokenize(&spec, &argv)?;

        self.apply_tokens(tokens)?;
        self.set_argc(argv.len().saturating_sub(self.positional_arguments().len()));
        Ok(())
    }

    /// Parse, and on failure terminate the process the conventional way:
    /// status 1 after printing help, status 2 after printing the error.
    pub fn parse_or_exit<S: AsRef<str>>(&mut self, argv: &[S]) {
        if let Err(err) = self.parse(argv) {
            if err != ParseError::HelpRequested {
                eprintln!("flags:FATAL {err}");
            }
            std::process::exit(i32::from(err.status().code()));
        }
    }

    /// Run the state machine over an already normalized token stream.
    pub fn apply_tokens(&mut self, tokens: Vec<String>) -> ParseResult<()> {
        let mut state = State::ScanningOptions;
        let mut stream = tokens.into_iter().peekable();

        while let Some(token) = stream.next() {
            if state == State::CollectingPositionals {
                self.push_positional(token);
                continue;
            }
            if token == SEPARATOR {
                state = State::CollectingPositionals;
                continue;
            }

            let resolved = self.resolve(&token)?;
            let value = match (resolved.flag_type, resolved.form) {
                (FlagType::Boolean, Form::Negated) => FlagValue::Boolean(false),
                // Presence of a following token marks an attached argument.
                (FlagType::Boolean, Form::Long) => FlagValue::Boolean(stream.peek().is_some()),
                // Short booleans flip the default, never the current value.
                (FlagType::Boolean, Form::Short) => {
                    FlagValue::Boolean(!resolved.default.as_bool().unwrap_or(false))
                }
                (FlagType::Integer, _) => {
                    let raw = stream
                        .next()
                        .ok_or_else(|| ParseError::MissingValue(token.clone()))?;
                    FlagValue::coerce(FlagType::Integer, &raw)
                        .ok_or(ParseError::InvalidInteger(raw))?
                }
                (FlagType::String, _) => FlagValue::String(
                    stream
                        .next()
                        .ok_or_else(|| ParseError::MissingValue(token.clone()))?,
                ),
            };

            tracing::debug!(flag = %resolved.key, %value, "set flag");
            let wants_help = resolved.key == HELP_FLAG && value == FlagValue::Boolean(true);
            self.set_value(&resolved.key, value);

            if wants_help {
                self.print_help();
                return Err(ParseError::HelpRequested);
            }
        }
        Ok(())
    }

    fn resolve(&self, token: &str) -> ParseResult<Resolved> {
        let (def, form) = if let Some(name) = token.strip_prefix("--") {
            if let Some(def) = self.flag_by_long(name) {
                (def, Form::Long)
            } else if let Some(def) = self.flag_by_negation(name) {
                (def, Form::Negated)
            } else {
                return Err(ParseError::Unrecognized(name.to_string()));
            }
        } else if let Some(name) = token.strip_prefix('-') {
            let mut chars = name.chars();
            let def = match (chars.next(), chars.next()) {
                (Some(c), None) => self.flag_by_short(c),
                _ => None,
            };
            match def {
                Some(def) => (def, Form::Short),
                None => return Err(ParseError::Unrecognized(name.to_string())),
            }
        } else {
            return Err(ParseError::Unrecognized(token.to_string()));
        };

        let flag_type = if form == Form::Negated {
            FlagType::Boolean
        } else {
            def.flag_type()
        };
        Ok(Resolved {
            key: def.key().to_string(),
            flag_type,
            default: def.default_value().clone(),
            form,
        })
    }
}
