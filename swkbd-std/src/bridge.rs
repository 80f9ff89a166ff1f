use crate::{
    BridgeOptions, Completion, HostSlot, InputFilter, KeyboardDialog, Phase, Session, UiHost,
    messages,
};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering::Relaxed},
};
use swkbd_core::{
    ButtonConfig, ConfigValidator, KeyboardConfig, KeyboardData, ValidationError, Validator,
};

struct Inner {
    active: Mutex<Option<Arc<Session>>>,
    host: HostSlot,
    next_id: AtomicU64,
    options: BridgeOptions,
    validator: Arc<dyn Validator>,
}

/// Blocking entry point the emulator uses to run the software keyboard.
///
/// The emulator thread calls [`KeyboardBridge::execute`]; the dialog runs on
/// the attached [`UiHost`]'s UI thread. Only one invocation may be in flight,
/// overlapping calls are refused. Cloning yields another handle to the same
/// bridge.
#[derive(Clone)]
pub struct KeyboardBridge {
    inner: Arc<Inner>,
}

/// Clears the in-flight session when `execute` returns.
struct ActiveGuard<'a> {
    id: u64,
    inner: &'a Inner,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.inner.lock_active();
        if active.as_ref().is_some_and(|session| session.id() == self.id) {
            *active = None;
        }
    }
}

impl Inner {
    fn active_config(&self) -> Option<Arc<KeyboardConfig>> {
        self.lock_active().as_ref().map(|session| session.config_arc())
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<Arc<Session>>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyboardBridge {
    /// Attaches the UI host. Only a weak reference is kept.
    pub fn attach<H: UiHost + 'static>(&self, host: &Arc<H>) {
        let host: Arc<dyn UiHost> = Arc::<H>::clone(host);
        self.inner.host.attach(Arc::downgrade(&host));
        tracing::debug!("UI host attached");
    }

    /// Releases the UI host. A dialog already on screen stays open.
    pub fn detach(&self) {
        self.inner.host.detach();
        tracing::debug!("UI host detached");
    }

    /// Shows the keyboard described by `config` and blocks until the user
    /// is done with it.
    ///
    /// Never fails: every outcome other than a button press yields
    /// [`KeyboardData::placeholder`].
    #[must_use]
    pub fn execute(&self, config: KeyboardConfig) -> KeyboardData {
        self.execute_completion(config).into_data()
    }

    /// Like [`KeyboardBridge::execute`], but tells apart why no text came
    /// back.
    #[must_use]
    pub fn execute_completion(&self, config: KeyboardConfig) -> Completion {
        if config.button_config == ButtonConfig::None {
            tracing::error!("unexpected button config None");
            return Completion::Unavailable;
        }

        if let Err(err) = config.check() {
            tracing::warn!(%err, "keyboard config labels don't match its buttons");
        }

        let Some(host) = self.inner.host.get() else {
            tracing::error!("no UI host attached, keyboard unavailable");
            return Completion::Unavailable;
        };

        if host.is_ui_thread() {
            tracing::error!("keyboard requested from the UI thread, refusing to block it");
            return Completion::Unavailable;
        }

        let session = {
            let mut active = self.inner.lock_active();
            if let Some(current) = active.as_ref() {
                tracing::warn!(
                    session = current.id(),
                    "keyboard already in progress, refusing overlapping request"
                );
                return Completion::Busy;
            }

            let id = self.inner.next_id.fetch_add(1, Relaxed);
            let session = Session::new(id, Arc::new(config));
            *active = Some(Arc::clone(&session));
            session
        };

        let _active = ActiveGuard {
            id: session.id(),
            inner: &self.inner,
        };

        tracing::debug!(session = session.id(), "dispatching keyboard dialog");
        session.mark_dispatched();

        let dialog = KeyboardDialog::new(self.clone(), Arc::clone(&session));
        let ui_host = Arc::downgrade(&host);
        host.run_on_ui_thread(Box::new(move || {
            // Dropping the dialog on any early return dismisses it.
            let Some(ui_host) = ui_host.upgrade() else {
                return;
            };
            if dialog.mark_presented() {
                ui_host.show_keyboard(dialog);
            }
        }));

        // Don't keep the host alive while blocked.
        drop(host);

        let completion = session.wait(self.inner.options.timeout());
        tracing::debug!(session = session.id(), ?completion, "keyboard finished");
        completion
    }

    /// Shows why `error` rejected the input. Does nothing when detached.
    pub fn handle_validation_error(&self, config: &KeyboardConfig, error: ValidationError) {
        let message = messages::validation_message(config, error);
        self.show_on_ui(move |host| host.show_message(messages::SOFTWARE_KEYBOARD, &message));
    }

    /// Text-field filter for the in-flight keyboard, if any.
    #[must_use]
    pub fn input_filter(&self) -> Option<InputFilter> {
        self.inner
            .active_config()
            .map(|config| InputFilter::new(config, self.validator()))
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.host.is_attached()
    }

    /// Bridge with the [`ConfigValidator`] described by `options`.
    #[must_use]
    pub fn new(options: BridgeOptions) -> Self {
        let validator = Arc::new(options.validator());
        Self::with_validator(options, validator)
    }

    /// Phase of the in-flight invocation, [`Phase::Idle`] when there is none.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner
            .lock_active()
            .as_ref()
            .map_or(Phase::Idle, |session| session.phase())
    }

    /// Surfaces an error message from the emulator. Does nothing when
    /// detached.
    pub fn show_error(&self, message: &str) {
        let message = message.to_owned();
        self.show_on_ui(move |host| host.show_alert(messages::SOFTWARE_KEYBOARD, &message));
    }

    fn show_on_ui<F>(&self, show: F)
    where
        F: FnOnce(&dyn UiHost) + Send + 'static,
    {
        let Some(host) = self.inner.host.get() else {
            tracing::debug!("no UI host attached, message dropped");
            return;
        };

        let ui_host = Arc::downgrade(&host);
        host.run_on_ui_thread(Box::new(move || {
            if let Some(ui_host) = ui_host.upgrade() {
                show(&*ui_host);
            }
        }));
    }

    /// Runs the filter predicate against the in-flight keyboard's config.
    /// Without one there is nothing to check against and the text passes.
    #[must_use]
    pub fn validate_filters(&self, text: &str) -> ValidationError {
        self.inner
            .active_config()
            .map_or(ValidationError::None, |config| {
                self.inner.validator.validate_filters(&config, text)
            })
    }

    /// Runs the submission predicate against the in-flight keyboard's
    /// config. Without one the text passes.
    #[must_use]
    pub fn validate_input(&self, text: &str) -> ValidationError {
        self.inner
            .active_config()
            .map_or(ValidationError::None, |config| {
                self.inner.validator.validate_input(&config, text)
            })
    }

    #[must_use]
    pub fn validator(&self) -> Arc<dyn Validator> {
        Arc::clone(&self.inner.validator)
    }

    /// Bridge delegating validation to `validator`, usually the emulator
    /// core.
    #[must_use]
    pub fn with_validator(options: BridgeOptions, validator: Arc<dyn Validator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                active: Mutex::new(None),
                host: HostSlot::default(),
                next_id: AtomicU64::new(1),
                options,
                validator,
            }),
        }
    }
}

impl Default for KeyboardBridge {
    fn default() -> Self {
        Self::with_validator(BridgeOptions::default(), Arc::new(ConfigValidator::new()))
    }
}
