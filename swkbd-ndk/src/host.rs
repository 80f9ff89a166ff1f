use crate::{DialogRegistry, Error};
use jni::{
    JNIEnv, JavaVM,
    objects::{GlobalRef, JObject, JValue},
    sys::jsize,
};
use std::{
    collections::VecDeque,
    mem,
    sync::{Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
};
use swkbd_std::{KeyboardDialog, UiHost, UiTask};

const SHOW_KEYBOARD_SIG: &str = "(JLjava/lang/String;IZ[Ljava/lang/String;)V";
const SHOW_TEXT_SIG: &str = "(Ljava/lang/String;Ljava/lang/String;)V";

/// Thread the activity runs its UI on. `nativeAttach` is called there, so
/// the host records it on creation.
struct UiThread(ThreadId);

impl UiThread {
    fn current() -> Self {
        Self(thread::current().id())
    }

    fn is_current(&self) -> bool {
        thread::current().id() == self.0
    }
}

/// UI host backed by the Java activity.
///
/// Tasks are queued here and the activity is asked to call
/// `nativeRunUiTasks` from its UI thread, which drains the queue.
pub struct JniHost {
    activity: GlobalRef,
    dialogs: DialogRegistry,
    tasks: Mutex<VecDeque<UiTask>>,
    ui_thread: UiThread,
    vm: JavaVM,
}

impl JniHost {
    fn call_show(&self, method: &str, title: &str, message: &str) -> Result<(), Error> {
        let mut env = self.vm.attach_current_thread()?;
        let title = env.new_string(title)?;
        let message = env.new_string(message)?;
        env.call_method(
            self.activity.as_obj(),
            method,
            SHOW_TEXT_SIG,
            &[(&title).into(), (&message).into()],
        )?;
        Ok(())
    }

    pub const fn dialogs(&self) -> &DialogRegistry {
        &self.dialogs
    }

    fn lock_tasks(&self) -> MutexGuard<'_, VecDeque<UiTask>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn new(env: &JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, Error> {
        Ok(Self {
            activity: env.new_global_ref(activity)?,
            dialogs: DialogRegistry::default(),
            tasks: Mutex::default(),
            ui_thread: UiThread::current(),
            vm: env.get_java_vm()?,
        })
    }

    fn request_ui_tasks(&self) -> Result<(), Error> {
        let mut env = self.vm.attach_current_thread()?;
        env.call_method(self.activity.as_obj(), "requestUiTasks", "()V", &[])?;
        Ok(())
    }

    /// Runs every queued task, including ones queued while draining. Must
    /// be called from the activity's UI thread.
    pub fn run_ui_tasks(&self) -> usize {
        if !self.ui_thread.is_current() {
            log::warn!("UI tasks drained off the UI thread");
        }

        let mut ran = 0;
        loop {
            let task = self.lock_tasks().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    fn show_dialog(&self, dialog: &KeyboardDialog) -> Result<(), Error> {
        let config = dialog.config();
        let mut env = self.vm.attach_current_thread()?;

        let hint = match &config.hint_text {
            Some(hint) => JObject::from(env.new_string(hint)?),
            None => JObject::null(),
        };

        let count = jsize::try_from(config.button_config.button_count()).unwrap_or_default();
        let labels = env.new_object_array(count, "java/lang/String", JObject::null())?;
        for (index, label) in (0..count).zip(dialog.labels()) {
            let label = env.new_string(label)?;
            env.set_object_array_element(&labels, index, &label)?;
        }

        env.call_method(
            self.activity.as_obj(),
            "showKeyboard",
            SHOW_KEYBOARD_SIG,
            &[
                JValue::Long(dialog.id().cast_signed()),
                (&hint).into(),
                JValue::Int(i32::from(config.max_text_length)),
                JValue::Bool(u8::from(config.multiline_mode)),
                (&labels).into(),
            ],
        )?;
        Ok(())
    }
}

impl UiHost for JniHost {
    fn run_on_ui_thread(&self, task: UiTask) {
        self.lock_tasks().push_back(task);

        if let Err(e) = self.request_ui_tasks() {
            log::error!("Failed to request UI tasks: {e}");
            // Nobody will drain the queue, dropping the tasks releases
            // whoever waits on them.
            let dropped = mem::take(&mut *self.lock_tasks());
            drop(dropped);
        }
    }

    fn is_ui_thread(&self) -> bool {
        self.ui_thread.is_current()
    }

    fn show_alert(&self, title: &str, message: &str) {
        if let Err(e) = self.call_show("showAlert", title, message) {
            log::error!("Failed to show alert: {e}");
        }
    }

    fn show_keyboard(&self, dialog: KeyboardDialog) {
        let id = dialog.id();
        match self.show_dialog(&dialog) {
            Ok(()) => self.dialogs.insert(dialog),
            Err(e) => log::error!("Failed to show keyboard for session {id}: {e}"),
        }
    }

    fn show_message(&self, title: &str, message: &str) {
        if let Err(e) = self.call_show("showMessage", title, message) {
            log::error!("Failed to show message: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_thread_is_the_creating_thread() {
        let ui_thread = UiThread::current();
        assert!(ui_thread.is_current());

        let elsewhere = thread::scope(|scope| scope.spawn(|| ui_thread.is_current()).join());
        assert!(!elsewhere.unwrap());
    }
}
