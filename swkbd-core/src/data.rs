use alloc::string::String;

/// Result of a keyboard invocation, handed back to the emulator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyboardData {
    /// Index of the pressed button.
    pub button: u8,
    pub text: String,
}

impl KeyboardData {
    #[must_use]
    #[inline]
    pub fn new(button: u8, text: impl Into<String>) -> Self {
        Self {
            button,
            text: text.into(),
        }
    }

    /// The value returned when no answer was produced.
    #[must_use]
    #[inline]
    pub const fn placeholder() -> Self {
        Self {
            button: 0,
            text: String::new(),
        }
    }
}
