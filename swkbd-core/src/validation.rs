use crate::{AcceptedInput, Error, KeyboardConfig};
use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt;

/// Why the applet refused a piece of text or a button press.
///
/// The discriminants are the ordinals used across the JNI boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ValidationError {
    #[default]
    None = 0,

    // Button selection
    ButtonOutOfRange = 1,

    // Configured filters
    MaxDigitsExceeded = 2,
    AtSignNotAllowed = 3,
    PercentNotAllowed = 4,
    BackslashNotAllowed = 5,
    ProfanityNotAllowed = 6,
    CallbackFailed = 7,

    // Accepted input mode
    FixedLengthRequired = 8,
    MaxLengthExceeded = 9,
    BlankInputNotAllowed = 10,
    EmptyInputNotAllowed = 11,
}

impl ValidationError {
    #[must_use]
    #[inline]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::None)
    }

    /// Raw value passed to the UI side.
    #[must_use]
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ValidationError {
    type Error = Error;

    #[inline]
    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0 => Self::None,
            1 => Self::ButtonOutOfRange,
            2 => Self::MaxDigitsExceeded,
            3 => Self::AtSignNotAllowed,
            4 => Self::PercentNotAllowed,
            5 => Self::BackslashNotAllowed,
            6 => Self::ProfanityNotAllowed,
            7 => Self::CallbackFailed,
            8 => Self::FixedLengthRequired,
            9 => Self::MaxLengthExceeded,
            10 => Self::BlankInputNotAllowed,
            11 => Self::EmptyInputNotAllowed,
            _ => return Err(Error::InvalidValidationError { raw }),
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::None => "valid",
            Self::ButtonOutOfRange => "button out of range",
            Self::MaxDigitsExceeded => "too many digits",
            Self::AtSignNotAllowed => "'@' not allowed",
            Self::PercentNotAllowed => "'%' not allowed",
            Self::BackslashNotAllowed => "'\\' not allowed",
            Self::ProfanityNotAllowed => "profanity not allowed",
            Self::CallbackFailed => "rejected by callback",
            Self::FixedLengthRequired => "fixed length required",
            Self::MaxLengthExceeded => "maximum length exceeded",
            Self::BlankInputNotAllowed => "blank input not allowed",
            Self::EmptyInputNotAllowed => "empty input not allowed",
        };
        f.write_str(text)
    }
}

/// Input predicates exposed by the emulator core.
///
/// Every method must be a pure function of its arguments: the bridge calls
/// them on every keystroke from the UI thread.
pub trait Validator: Send + Sync {
    /// Checks `text` against the configured character filters only.
    fn validate_filters(&self, config: &KeyboardConfig, text: &str) -> ValidationError;

    /// Checks `text` for submission: filters first, then the accepted input
    /// mode and length limits.
    #[inline]
    fn validate_input(&self, config: &KeyboardConfig, text: &str) -> ValidationError {
        match self.validate_filters(config, text) {
            ValidationError::None => check_accept_mode(config, text),
            error => error,
        }
    }

    #[inline]
    fn validate_button(&self, config: &KeyboardConfig, button: u8) -> ValidationError {
        if usize::from(button) < config.button_config.button_count() {
            ValidationError::None
        } else {
            ValidationError::ButtonOutOfRange
        }
    }
}

/// Length and accepted input mode rules applied on submission.
#[must_use]
#[inline]
pub fn check_accept_mode(config: &KeyboardConfig, text: &str) -> ValidationError {
    let len = text.chars().count();

    if len > usize::from(config.max_text_length) {
        return ValidationError::MaxLengthExceeded;
    }

    let is_empty = text.is_empty();
    let is_blank = text.chars().all(char::is_whitespace);

    match config.accept_mode {
        AcceptedInput::FixedLength if len != usize::from(config.max_text_length) => {
            ValidationError::FixedLengthRequired
        }
        AcceptedInput::NotEmpty | AcceptedInput::NotEmptyAndNotBlank if is_empty => {
            ValidationError::EmptyInputNotAllowed
        }
        AcceptedInput::NotBlank | AcceptedInput::NotEmptyAndNotBlank if is_blank => {
            ValidationError::BlankInputNotAllowed
        }
        _ => ValidationError::None,
    }
}

/// Application supplied check run when [`crate::Filters::enable_callback`] is set.
pub type InputCallback = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// [`Validator`] driven entirely by the [`KeyboardConfig`].
#[derive(Default)]
pub struct ConfigValidator {
    blocked_words: Vec<String>,
    callback: Option<InputCallback>,
}

impl ConfigValidator {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Words rejected when the profanity filter is enabled. Matching ignores
    /// case.
    #[must_use]
    #[inline]
    pub fn with_blocked_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocked_words = words
            .into_iter()
            .map(|word| word.as_ref().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        self
    }

    #[must_use]
    #[inline]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    fn contains_blocked_word(&self, text: &str) -> bool {
        if self.blocked_words.is_empty() {
            return false;
        }

        let text = text.to_lowercase();
        self.blocked_words
            .iter()
            .any(|word| text.contains(word.as_str()))
    }

    fn run_filters(&self, config: &KeyboardConfig, text: &str) -> ValidationError {
        let filters = &config.filters;

        if filters.prevent_digit
            && text.chars().filter(char::is_ascii_digit).count() > usize::from(config.max_digits)
        {
            return ValidationError::MaxDigitsExceeded;
        }
        if filters.prevent_at && text.contains('@') {
            return ValidationError::AtSignNotAllowed;
        }
        if filters.prevent_percent && text.contains('%') {
            return ValidationError::PercentNotAllowed;
        }
        if filters.prevent_backslash && text.contains('\\') {
            return ValidationError::BackslashNotAllowed;
        }
        if filters.prevent_profanity && self.contains_blocked_word(text) {
            return ValidationError::ProfanityNotAllowed;
        }
        if filters.enable_callback {
            match &self.callback {
                Some(callback) if !callback(text) => return ValidationError::CallbackFailed,
                Some(_) => {}
                None => tracing::debug!("input callback requested but none installed"),
            }
        }

        ValidationError::None
    }
}

impl Validator for ConfigValidator {
    #[inline]
    fn validate_filters(&self, config: &KeyboardConfig, text: &str) -> ValidationError {
        let error = self.run_filters(config, text);
        if !error.is_valid() {
            tracing::debug!(%error, "text rejected by keyboard filters");
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ButtonConfig, Filters};
    use tracing_test::traced_test;

    fn filtered(filters: Filters) -> KeyboardConfig {
        KeyboardConfig::new(ButtonConfig::Dual)
            .with_max_text_length(16)
            .with_filters(filters)
    }

    #[test]
    fn ordinals_round_trip_through_raw() {
        for raw in 0..=11_u8 {
            let error = ValidationError::try_from(raw).unwrap();
            assert_eq!(error.ordinal(), raw);
        }
        assert!(ValidationError::try_from(12).is_err());
    }

    #[test]
    fn digit_limit() {
        let config = filtered(Filters {
            prevent_digit: true,
            ..Filters::default()
        })
        .with_max_digits(2);
        let validator = ConfigValidator::new();

        assert_eq!(validator.validate_filters(&config, "a1b2"), ValidationError::None);
        assert_eq!(
            validator.validate_filters(&config, "123"),
            ValidationError::MaxDigitsExceeded
        );
    }

    #[test]
    fn character_filters() {
        let config = filtered(Filters {
            prevent_at: true,
            prevent_percent: true,
            prevent_backslash: true,
            ..Filters::default()
        });
        let validator = ConfigValidator::new();

        assert_eq!(
            validator.validate_filters(&config, "ABC@"),
            ValidationError::AtSignNotAllowed
        );
        assert_eq!(
            validator.validate_filters(&config, "50%"),
            ValidationError::PercentNotAllowed
        );
        assert_eq!(
            validator.validate_filters(&config, "C:\\"),
            ValidationError::BackslashNotAllowed
        );
        assert_eq!(validator.validate_filters(&config, "plain"), ValidationError::None);
    }

    #[test]
    fn filters_off_allow_everything() {
        let config = filtered(Filters::default());
        let validator = ConfigValidator::new().with_blocked_words(["darn"]);

        assert_eq!(
            validator.validate_filters(&config, "@%\\ darn 12345"),
            ValidationError::None
        );
    }

    #[test]
    fn profanity_ignores_case() {
        let config = filtered(Filters {
            prevent_profanity: true,
            ..Filters::default()
        });
        let validator = ConfigValidator::new().with_blocked_words(["Darn", ""]);

        assert_eq!(
            validator.validate_filters(&config, "oh DARN it"),
            ValidationError::ProfanityNotAllowed
        );
        assert_eq!(validator.validate_filters(&config, "oh dear"), ValidationError::None);
    }

    #[test]
    fn callback_filter() {
        let config = filtered(Filters {
            enable_callback: true,
            ..Filters::default()
        });

        let validator = ConfigValidator::new().with_callback(|text| text.starts_with('x'));
        assert_eq!(validator.validate_filters(&config, "xyz"), ValidationError::None);
        assert_eq!(
            validator.validate_filters(&config, "abc"),
            ValidationError::CallbackFailed
        );
    }

    #[traced_test]
    #[test]
    fn missing_callback_passes_and_logs() {
        let config = filtered(Filters {
            enable_callback: true,
            ..Filters::default()
        });

        assert_eq!(
            ConfigValidator::new().validate_filters(&config, "abc"),
            ValidationError::None
        );
        assert!(logs_contain("input callback requested but none installed"));
    }

    #[traced_test]
    #[test]
    fn rejection_is_logged() {
        let config = filtered(Filters {
            prevent_at: true,
            ..Filters::default()
        });

        let _error = ConfigValidator::new().validate_filters(&config, "a@b");
        assert!(logs_contain("text rejected by keyboard filters"));
    }

    #[test]
    fn length_limits() {
        let validator = ConfigValidator::new();
        let config = KeyboardConfig::new(ButtonConfig::Single).with_max_text_length(4);

        assert_eq!(validator.validate_input(&config, "abcd"), ValidationError::None);
        assert_eq!(
            validator.validate_input(&config, "abcde"),
            ValidationError::MaxLengthExceeded
        );
        // Multi-byte characters count once.
        assert_eq!(validator.validate_input(&config, "ñññ"), ValidationError::None);

        let fixed = config.with_accept_mode(AcceptedInput::FixedLength);
        assert_eq!(
            validator.validate_input(&fixed, "abc"),
            ValidationError::FixedLengthRequired
        );
        assert_eq!(validator.validate_input(&fixed, "abcd"), ValidationError::None);
    }

    #[test]
    fn zero_length_admits_only_empty() {
        let validator = ConfigValidator::new();
        let config = KeyboardConfig::new(ButtonConfig::Single);

        assert_eq!(validator.validate_input(&config, ""), ValidationError::None);
        assert_eq!(
            validator.validate_input(&config, "a"),
            ValidationError::MaxLengthExceeded
        );
    }

    #[test]
    fn empty_and_blank_modes() {
        let validator = ConfigValidator::new();
        let base = KeyboardConfig::new(ButtonConfig::Single).with_max_text_length(8);

        let not_empty = base.clone().with_accept_mode(AcceptedInput::NotEmpty);
        assert_eq!(
            validator.validate_input(&not_empty, ""),
            ValidationError::EmptyInputNotAllowed
        );
        assert_eq!(validator.validate_input(&not_empty, "  "), ValidationError::None);

        let not_blank = base.clone().with_accept_mode(AcceptedInput::NotBlank);
        assert_eq!(
            validator.validate_input(&not_blank, " \t"),
            ValidationError::BlankInputNotAllowed
        );
        assert_eq!(
            validator.validate_input(&not_blank, ""),
            ValidationError::BlankInputNotAllowed
        );

        let both = base.with_accept_mode(AcceptedInput::NotEmptyAndNotBlank);
        assert_eq!(
            validator.validate_input(&both, ""),
            ValidationError::EmptyInputNotAllowed
        );
        assert_eq!(
            validator.validate_input(&both, "   "),
            ValidationError::BlankInputNotAllowed
        );
        assert_eq!(validator.validate_input(&both, " a "), ValidationError::None);
    }

    #[test]
    fn filters_win_over_length() {
        let validator = ConfigValidator::new();
        let config = KeyboardConfig::new(ButtonConfig::Single)
            .with_max_text_length(2)
            .with_filters(Filters {
                prevent_at: true,
                ..Filters::default()
            });

        assert_eq!(
            validator.validate_input(&config, "@@@@"),
            ValidationError::AtSignNotAllowed
        );
    }

    #[test]
    fn button_range() {
        let validator = ConfigValidator::new();
        let config = KeyboardConfig::new(ButtonConfig::Dual);

        assert_eq!(validator.validate_button(&config, 1), ValidationError::None);
        assert_eq!(
            validator.validate_button(&config, 2),
            ValidationError::ButtonOutOfRange
        );
        assert_eq!(
            validator.validate_button(&KeyboardConfig::new(ButtonConfig::None), 0),
            ValidationError::ButtonOutOfRange
        );
    }

    #[test]
    fn predicates_are_repeatable() {
        let validator = ConfigValidator::new().with_blocked_words(["bad"]);
        let config = KeyboardConfig::new(ButtonConfig::Triple)
            .with_max_text_length(6)
            .with_accept_mode(AcceptedInput::NotEmptyAndNotBlank)
            .with_filters(Filters {
                prevent_profanity: true,
                prevent_percent: true,
                ..Filters::default()
            });

        for text in ["", " ", "bad", "100%", "good", "toolongtext"] {
            let first = validator.validate_input(&config, text);
            for _ in 0..8 {
                assert_eq!(validator.validate_input(&config, text), first);
                assert_eq!(
                    validator.validate_filters(&config, text),
                    validator.validate_filters(&config, text)
                );
            }
        }
    }
}
