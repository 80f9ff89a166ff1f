use crate::{Completion, InputFilter, KeyboardBridge, Session};
use std::sync::Arc;
use swkbd_core::{KeyboardConfig, KeyboardData, ValidationError};

/// Handle the UI host holds while the keyboard dialog is on screen.
///
/// The emulator thread stays blocked until the handle completes, either by
/// [`KeyboardDialog::press`], [`KeyboardDialog::dismiss`] or by being
/// dropped. Dropping an open handle counts as a dismissal, so tearing down
/// the UI always releases the emulator.
pub struct KeyboardDialog {
    bridge: KeyboardBridge,
    completed: bool,
    session: Arc<Session>,
}

impl KeyboardDialog {
    #[must_use]
    pub fn config(&self) -> &KeyboardConfig {
        self.session.config()
    }

    /// Closes the dialog without a button press.
    pub fn dismiss(mut self) {
        self.finish(Completion::Dismissed);
    }

    fn finish(&mut self, completion: Completion) {
        self.completed = true;
        if self.session.complete(completion) {
            tracing::debug!(session = self.session.id(), "keyboard dialog completed");
        }
    }

    /// Session identifier, stable for the lifetime of the dialog.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.session.id()
    }

    #[must_use]
    pub fn input_filter(&self) -> InputFilter {
        InputFilter::new(self.session.config_arc(), self.bridge.validator())
    }

    /// Whether the emulator is still waiting on this dialog.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.completed && !self.session.is_completed()
    }

    /// Button labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.config().labels()
    }

    /// Moves the session to `AwaitingUserInput`. `false` if the emulator
    /// stopped waiting before the UI got to the dialog.
    pub(crate) fn mark_presented(&self) -> bool {
        self.session.mark_presented()
    }

    pub(crate) const fn new(bridge: KeyboardBridge, session: Arc<Session>) -> Self {
        Self {
            bridge,
            completed: false,
            session,
        }
    }

    /// The user pressed `button` with `text` in the field.
    ///
    /// The rightmost button submits `text` and requires it to pass input
    /// validation; the other buttons (cancel, "I forgot") return their index
    /// with empty text. On a validation error the explanation is shown to
    /// the user and the dialog stays open.
    ///
    /// # Errors
    ///
    /// Returns the validation error that kept the dialog open.
    pub fn press(&mut self, button: u8, text: &str) -> Result<(), ValidationError> {
        let validator = self.bridge.validator();
        let config = self.session.config();

        let mut error = validator.validate_button(config, button);
        let confirm = config.button_config.confirm_button() == Some(button);

        if error.is_valid() && confirm {
            error = validator.validate_input(config, text);
        }

        if !error.is_valid() {
            tracing::debug!(session = self.session.id(), button, %error, "keyboard input rejected");
            self.bridge.handle_validation_error(config, error);
            return Err(error);
        }

        let data = if confirm {
            KeyboardData::new(button, text)
        } else {
            KeyboardData::new(button, "")
        };

        self.finish(Completion::Submitted(data));
        Ok(())
    }
}

impl Drop for KeyboardDialog {
    fn drop(&mut self) {
        if !self.completed {
            self.finish(Completion::Dismissed);
        }
    }
}
