/// Three-tier status used for return values and process exit codes.
///
/// `True` doubles as "boolean true" and "success", following the shell
/// convention where a zero exit status is truthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    True,
    False,
    Error,
}

impl Status {
    pub const fn code(self) -> u8 {
        match self {
            Self::True => 0,
            Self::False => 1,
            Self::Error => 2,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::True
    }

    /// Shell rendering of a boolean value (`0` for true, `1` for false).
    pub fn from_bool(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Status> for std::process::ExitCode {
    fn from(status: Status) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
