//! UI host running its own UI thread, for driving the bridge from tests.

#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle, ThreadId},
    time::Duration,
};
use swkbd_std::{KeyboardBridge, KeyboardDialog, UiHost, UiTask};

pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, PartialEq, Eq)]
pub enum Shown {
    Alert { title: String, message: String },
    Message { title: String, message: String },
}

pub struct ThreadHost {
    dialogs: Sender<KeyboardDialog>,
    shown: Sender<Shown>,
    tasks: Sender<UiTask>,
    ui_thread: ThreadId,
}

impl UiHost for ThreadHost {
    fn run_on_ui_thread(&self, task: UiTask) {
        // The UI thread only stops once the host is gone.
        let _ = self.tasks.send(task);
    }

    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    fn show_alert(&self, title: &str, message: &str) {
        assert!(self.is_ui_thread());
        let _ = self.shown.send(Shown::Alert {
            title: title.to_owned(),
            message: message.to_owned(),
        });
    }

    fn show_keyboard(&self, dialog: KeyboardDialog) {
        assert!(self.is_ui_thread());
        let _ = self.dialogs.send(dialog);
    }

    fn show_message(&self, title: &str, message: &str) {
        assert!(self.is_ui_thread());
        let _ = self.shown.send(Shown::Message {
            title: title.to_owned(),
            message: message.to_owned(),
        });
    }
}

pub struct Harness {
    pub bridge: KeyboardBridge,
    pub dialogs: Receiver<KeyboardDialog>,
    pub host: Option<Arc<ThreadHost>>,
    pub shown: Receiver<Shown>,
    ui: Option<JoinHandle<()>>,
}

impl Harness {
    /// Attaches a fresh host with a running UI thread to `bridge`.
    pub fn attach(bridge: KeyboardBridge) -> Self {
        let (task_tx, task_rx) = mpsc::channel::<UiTask>();
        let (dialog_tx, dialog_rx) = mpsc::channel();
        let (shown_tx, shown_rx) = mpsc::channel();

        let ui = thread::Builder::new()
            .name("ui".to_owned())
            .spawn(move || {
                for task in task_rx {
                    task();
                }
            })
            .unwrap();

        let host = Arc::new(ThreadHost {
            dialogs: dialog_tx,
            shown: shown_tx,
            tasks: task_tx,
            ui_thread: ui.thread().id(),
        });
        bridge.attach(&host);

        Self {
            bridge,
            dialogs: dialog_rx,
            host: Some(host),
            shown: shown_rx,
            ui: Some(ui),
        }
    }

    /// Runs `execute` on an emulator thread.
    pub fn execute_on_worker(
        &self,
        config: swkbd_std::KeyboardConfig,
    ) -> JoinHandle<swkbd_std::Completion> {
        let bridge = self.bridge.clone();
        thread::Builder::new()
            .name("emu".to_owned())
            .spawn(move || bridge.execute_completion(config))
            .unwrap()
    }

    pub fn next_dialog(&self) -> KeyboardDialog {
        self.dialogs.recv_timeout(WAIT).unwrap()
    }

    pub fn next_shown(&self) -> Shown {
        self.shown.recv_timeout(WAIT).unwrap()
    }

    /// Drops the host, which stops the UI thread.
    pub fn teardown(&mut self) {
        self.host = None;
        if let Some(ui) = self.ui.take() {
            ui.join().unwrap();
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.host = None;
    }
}

/// Host that counts dispatched tasks and never runs them.
#[derive(Default)]
pub struct DroppingHost {
    pub dispatched: AtomicUsize,
}

impl DroppingHost {
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }
}

impl UiHost for DroppingHost {
    fn run_on_ui_thread(&self, task: UiTask) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        drop(task);
    }

    fn show_keyboard(&self, _dialog: KeyboardDialog) {}

    fn show_message(&self, _title: &str, _message: &str) {}
}

/// Host that claims every thread is its UI thread.
pub struct EverywhereUiHost;

impl UiHost for EverywhereUiHost {
    fn run_on_ui_thread(&self, task: UiTask) {
        task();
    }

    fn is_ui_thread(&self) -> bool {
        true
    }

    fn show_keyboard(&self, _dialog: KeyboardDialog) {}

    fn show_message(&self, _title: &str, _message: &str) {}
}
