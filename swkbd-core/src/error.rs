use core::{error, fmt};
use fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ButtonTextMismatch { expected: usize, actual: usize },
    InvalidButtonConfig { raw: u8 },
    InvalidValidationError { raw: u8 },
    TooManyButtonLabels,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ButtonTextMismatch { expected, actual } => write!(
                f,
                "button text count does not match button config: expected {expected} labels, got {actual}"
            ),
            Self::InvalidButtonConfig { raw } => {
                write!(f, "invalid button config value: {raw}")
            }
            Self::InvalidValidationError { raw } => {
                write!(f, "invalid validation error ordinal: {raw}")
            }
            Self::TooManyButtonLabels => {
                write!(f, "too many button labels (maximum is 3)")
            }
        }
    }
}

impl error::Error for Error {}
