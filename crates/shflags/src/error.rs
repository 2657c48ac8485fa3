use thiserror::Error;

use crate::Status;
use crate::value::FlagType;

/// Failure to register a flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefineError {
    #[error("invalid flag definition: {0}")]
    Invalid(String),

    #[error("flag name ({0}) is reserved")]
    Reserved(String),

    #[error("definition for ({0}) already exists")]
    Duplicate(String),

    #[error("short flag (-{short}) already defined for ({existing})")]
    DuplicateShort { short: char, existing: String },

    #[error("invalid default {flag_type} value ({value}) for flag ({name})")]
    InvalidDefault {
        name: String,
        flag_type: FlagType,
        value: String,
    },
}

impl DefineError {
    /// Duplicates are warnings (first definition wins); everything else is fatal.
    pub fn status(&self) -> Status {
        match self {
            Self::Duplicate(_) | Self::DuplicateShort { .. } => Status::False,
            Self::Invalid(_) | Self::Reserved(_) | Self::InvalidDefault { .. } => Status::Error,
        }
    }
}

/// Failure while turning an argument vector into flag values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized option ({0})")]
    Unrecognized(String),

    #[error("invalid integer value ({0})")]
    InvalidInteger(String),

    #[error("missing value for option ({0})")]
    MissingValue(String),

    #[error("{0}")]
    Tokenizer(String),

    #[error("help requested")]
    HelpRequested,
}

impl ParseError {
    pub fn status(&self) -> Status {
        match self {
            Self::HelpRequested => Status::False,
            _ => Status::Error,
        }
    }
}

pub type DefineResult<T> = Result<T, DefineError>;
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_not_fatal() {
        assert_eq!(DefineError::Duplicate("x".into()).status(), Status::False);
        assert_eq!(
            DefineError::DuplicateShort {
                short: 'x',
                existing: "update".into()
            }
            .status(),
            Status::False
        );
        assert_eq!(DefineError::Reserved("help".into()).status(), Status::Error);
    }

    #[test]
    fn help_is_a_false_outcome() {
        assert_eq!(ParseError::HelpRequested.status(), Status::False);
        assert_eq!(
            ParseError::InvalidInteger("abc".into()).to_string(),
            "invalid integer value (abc)"
        );
    }
}
