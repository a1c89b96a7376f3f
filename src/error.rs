use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire playground crate.
pub type Result<T> = std::result::Result<T, PlaygroundErr>;

/// The playground's error type.
///
/// Training itself never fails, these only come up while building a network or
/// loading a configuration.
#[derive(Debug)]
pub enum PlaygroundErr {
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyHiddenLayer,
    ParamGenExhausted {
        needed: usize,
    },
    InvalidConfig(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for PlaygroundErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaygroundErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "{what} has {got} entries but the hidden layer has {expected} units"
            ),
            PlaygroundErr::EmptyHiddenLayer => {
                write!(f, "the hidden layer needs at least one unit")
            }
            PlaygroundErr::ParamGenExhausted { needed } => write!(
                f,
                "the parameter generator ran out before producing {needed} values"
            ),
            PlaygroundErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            PlaygroundErr::Io(e) => write!(f, "io error: {e}"),
            PlaygroundErr::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl Error for PlaygroundErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PlaygroundErr::Io(e) => Some(e),
            PlaygroundErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PlaygroundErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PlaygroundErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
