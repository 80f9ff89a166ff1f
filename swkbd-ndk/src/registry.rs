use std::{
    collections::HashMap,
    mem,
    sync::{Mutex, MutexGuard, PoisonError},
};
use swkbd_std::{KeyboardDialog, ValidationError};

/// Keyboard dialogs the activity has on screen, by session id.
#[derive(Default)]
pub struct DialogRegistry {
    dialogs: Mutex<HashMap<u64, KeyboardDialog>>,
}

impl DialogRegistry {
    /// Dismisses every registered dialog.
    pub fn clear(&self) {
        let dialogs = mem::take(&mut *self.lock());
        if !dialogs.is_empty() {
            log::debug!("Dismissing {} keyboard dialog(s)", dialogs.len());
        }
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let dialog = self.lock().remove(&id);
        dialog.map(KeyboardDialog::dismiss).is_some()
    }

    /// Registers `dialog`, dropping dialogs whose session already ended,
    /// such as one the emulator stopped waiting on after a timeout.
    pub fn insert(&self, dialog: KeyboardDialog) {
        let id = dialog.id();
        let mut dialogs = self.lock();

        dialogs.retain(|stale, open| {
            let keep = open.is_open();
            if !keep {
                log::debug!("Dropping finished keyboard session {stale}");
            }
            keep
        });

        if let Some(stale) = dialogs.insert(id, dialog) {
            log::warn!("Replaced keyboard dialog for session {}", stale.id());
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, KeyboardDialog>> {
        self.dialogs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Presses `button` on dialog `id`. A dialog kept open by a validation
    /// error stays registered.
    pub fn press(&self, id: u64, button: u8, text: &str) -> ValidationError {
        let dialog = self.lock().remove(&id);
        let Some(mut dialog) = dialog else {
            log::warn!("Button press for unknown keyboard session {id}");
            return ValidationError::None;
        };

        match dialog.press(button, text) {
            Ok(()) => ValidationError::None,
            Err(error) => {
                self.insert(dialog);
                error
            }
        }
    }
}
