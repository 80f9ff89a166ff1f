use crate::KeyboardDialog;
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Work scheduled onto the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// The side that owns the UI thread, typically an activity.
///
/// Every `show_*` method is only ever called from a task previously passed
/// to [`UiHost::run_on_ui_thread`], so implementations may assume they run
/// on the UI thread.
pub trait UiHost: Send + Sync {
    /// Queues `task` to run on the UI thread and returns immediately.
    ///
    /// Dropping a task without running it is allowed. A dropped keyboard task
    /// dismisses its dialog.
    fn run_on_ui_thread(&self, task: UiTask);

    /// Whether the calling thread is the UI thread.
    fn is_ui_thread(&self) -> bool {
        false
    }

    /// Non-blocking alert for errors reported by the emulator.
    fn show_alert(&self, title: &str, message: &str) {
        self.show_message(title, message);
    }

    /// Presents the keyboard dialog. The host keeps `dialog` until the user
    /// presses a button or the dialog goes away.
    fn show_keyboard(&self, dialog: KeyboardDialog);

    fn show_message(&self, title: &str, message: &str);
}

/// Attachment point for the UI host.
///
/// Only a weak reference is kept: when the host goes away the slot reads as
/// detached.
#[derive(Default)]
pub struct HostSlot {
    host: RwLock<Option<Weak<dyn UiHost>>>,
}

impl HostSlot {
    pub fn attach(&self, host: Weak<dyn UiHost>) {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = Some(host);
    }

    pub fn detach(&self) {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn UiHost>> {
        self.host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.get().is_some()
    }
}
