use crate::Error;
use alloc::string::String;

/// Maximum number of buttons the applet can show.
pub const MAX_BUTTONS: usize = 3;

/// Button labels in display order, left to right.
pub type ButtonText = heapless::Vec<String, MAX_BUTTONS>;

/// How many buttons the keyboard dialog shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ButtonConfig {
    /// Ok
    #[default]
    Single = 0,
    /// Cancel | Ok
    Dual = 1,
    /// Cancel | I Forgot | Ok
    Triple = 2,
    /// No button. Never a valid request for the dialog.
    None = 3,
}

impl ButtonConfig {
    #[must_use]
    #[inline]
    pub const fn button_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
            Self::Triple => 3,
            Self::None => 0,
        }
    }

    /// Index of the button that submits the text, if any.
    #[must_use]
    #[inline]
    pub const fn confirm_button(self) -> Option<u8> {
        match self {
            Self::Single => Some(0),
            Self::Dual => Some(1),
            Self::Triple => Some(2),
            Self::None => None,
        }
    }

    /// Label shown for `index` when the caller supplied none.
    #[must_use]
    #[inline]
    pub const fn default_label(self, index: usize) -> &'static str {
        match (self, index) {
            (Self::Dual | Self::Triple, 0) => "Cancel",
            (Self::Triple, 1) => "I Forgot",
            _ => "OK",
        }
    }
}

impl TryFrom<u8> for ButtonConfig {
    type Error = Error;

    #[inline]
    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Single),
            1 => Ok(Self::Dual),
            2 => Ok(Self::Triple),
            3 => Ok(Self::None),
            _ => Err(Error::InvalidButtonConfig { raw }),
        }
    }
}

/// Which kinds of text the applet accepts on submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceptedInput {
    #[default]
    Anything,
    NotEmpty,
    NotEmptyAndNotBlank,
    NotBlank,
    /// Exactly `max_text_length` characters.
    FixedLength,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Mirrors the applet's filter flag word"
)]
pub struct Filters {
    pub enable_callback: bool,
    pub prevent_at: bool,
    pub prevent_backslash: bool,
    pub prevent_digit: bool,
    pub prevent_percent: bool,
    pub prevent_profanity: bool,
}

/// Parameters of a single keyboard invocation, as supplied by the emulator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyboardConfig {
    pub accept_mode: AcceptedInput,
    pub button_config: ButtonConfig,
    pub button_text: ButtonText,
    pub filters: Filters,
    /// Displayed in the field as a hint before any text is entered.
    pub hint_text: Option<String>,
    pub max_digits: u16,
    pub max_text_length: u16,
    /// True if the keyboard accepts multiple lines of input.
    pub multiline_mode: bool,
}

impl KeyboardConfig {
    /// Checks that the button labels match the button configuration.
    ///
    /// An empty label list is accepted, the default labels are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if labels were supplied and their count differs from
    /// [`ButtonConfig::button_count`].
    #[inline]
    pub fn check(&self) -> Result<(), Error> {
        let expected = self.button_config.button_count();
        let actual = self.button_text.len();

        if actual != 0 && actual != expected {
            return Err(Error::ButtonTextMismatch { expected, actual });
        }

        Ok(())
    }

    /// Label for button `index`, falling back to the default label.
    #[must_use]
    #[inline]
    pub fn label(&self, index: usize) -> &str {
        self.button_text
            .get(index)
            .filter(|label| !label.is_empty())
            .map_or_else(|| self.button_config.default_label(index), String::as_str)
    }

    /// Labels for every button of the configuration, in display order.
    #[inline]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        (0..self.button_config.button_count()).map(|index| self.label(index))
    }

    #[must_use]
    #[inline]
    pub fn new(button_config: ButtonConfig) -> Self {
        Self {
            button_config,
            ..Self::default()
        }
    }

    #[must_use]
    #[inline]
    pub const fn with_accept_mode(mut self, accept_mode: AcceptedInput) -> Self {
        self.accept_mode = accept_mode;
        self
    }

    /// Sets the button labels.
    ///
    /// # Errors
    ///
    /// Returns an error if more than [`MAX_BUTTONS`] labels are given.
    #[inline]
    pub fn with_button_text<I, S>(mut self, labels: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.button_text.clear();
        for label in labels {
            self.button_text
                .push(label.into())
                .map_err(|_label| Error::TooManyButtonLabels)?;
        }
        Ok(self)
    }

    #[must_use]
    #[inline]
    pub const fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    #[inline]
    pub fn with_hint_text(mut self, hint_text: impl Into<String>) -> Self {
        self.hint_text = Some(hint_text.into());
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_max_digits(mut self, max_digits: u16) -> Self {
        self.max_digits = max_digits;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_max_text_length(mut self, max_text_length: u16) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    #[must_use]
    #[inline]
    pub const fn with_multiline_mode(mut self, multiline_mode: bool) -> Self {
        self.multiline_mode = multiline_mode;
        self
    }
}
