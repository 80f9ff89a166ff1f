use swkbd_core::{KeyboardConfig, ValidationError};

/// Title of every dialog the bridge shows.
pub const SOFTWARE_KEYBOARD: &str = "Software Keyboard";

pub const BLANK_INPUT_NOT_ALLOWED: &str = "Blank input is not allowed";
pub const EMPTY_INPUT_NOT_ALLOWED: &str = "Empty input is not allowed";
pub const INVALID_INPUT: &str = "Invalid input";

const fn characters(count: u16) -> &'static str {
    if count == 1 { "character" } else { "characters" }
}

/// User facing explanation of why `error` rejected the input.
#[must_use]
pub fn validation_message(config: &KeyboardConfig, error: ValidationError) -> String {
    let length = config.max_text_length;

    match error {
        ValidationError::FixedLengthRequired => format!(
            "Text length is not correct (should be {length} {})",
            characters(length)
        ),
        ValidationError::MaxLengthExceeded => format!(
            "Text is too long (should be no more than {length} {})",
            characters(length)
        ),
        ValidationError::BlankInputNotAllowed => BLANK_INPUT_NOT_ALLOWED.to_owned(),
        ValidationError::EmptyInputNotAllowed => EMPTY_INPUT_NOT_ALLOWED.to_owned(),
        _ => INVALID_INPUT.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swkbd_core::ButtonConfig;

    fn config(max_text_length: u16) -> KeyboardConfig {
        KeyboardConfig::new(ButtonConfig::Single).with_max_text_length(max_text_length)
    }

    #[test]
    fn fixed_length_mentions_length() {
        let message = validation_message(&config(4), ValidationError::FixedLengthRequired);
        assert!(message.contains('4'));
        assert_eq!(message, "Text length is not correct (should be 4 characters)");
    }

    #[test]
    fn singular_length() {
        assert_eq!(
            validation_message(&config(1), ValidationError::MaxLengthExceeded),
            "Text is too long (should be no more than 1 character)"
        );
    }

    #[test]
    fn fixed_strings() {
        assert_eq!(
            validation_message(&config(4), ValidationError::BlankInputNotAllowed),
            BLANK_INPUT_NOT_ALLOWED
        );
        assert_eq!(
            validation_message(&config(4), ValidationError::EmptyInputNotAllowed),
            EMPTY_INPUT_NOT_ALLOWED
        );
    }

    #[test]
    fn everything_else_is_generic() {
        for error in [
            ValidationError::None,
            ValidationError::ButtonOutOfRange,
            ValidationError::AtSignNotAllowed,
            ValidationError::CallbackFailed,
        ] {
            assert_eq!(validation_message(&config(4), error), INVALID_INPUT);
        }
    }
}
