use std::{
    io::{self, BufRead, Write},
    mem,
    sync::{
        Mutex, MutexGuard, PoisonError,
        mpsc::{Receiver, Sender},
    },
    thread::{self, ThreadId},
};
use swkbd_std::{KeyboardDialog, UiHost, UiTask};

pub enum Event {
    /// The emulator thread got its answer.
    Done,
    Task(UiTask),
}

/// UI host whose UI thread is the one that created it. Dialogs are answered
/// on the terminal by [`run`].
pub struct TerminalHost {
    dialog: Mutex<Option<KeyboardDialog>>,
    events: Sender<Event>,
    notices: Mutex<Vec<String>>,
    ui_thread: ThreadId,
}

impl TerminalHost {
    fn lock_dialog(&self) -> MutexGuard<'_, Option<KeyboardDialog>> {
        self.dialog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_notices(&self) -> MutexGuard<'_, Vec<String>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn new(events: Sender<Event>) -> Self {
        Self {
            dialog: Mutex::new(None),
            events,
            notices: Mutex::default(),
            ui_thread: thread::current().id(),
        }
    }

    fn notify(&self, notice: String) {
        self.lock_notices().push(notice);
    }
}

impl UiHost for TerminalHost {
    fn run_on_ui_thread(&self, task: UiTask) {
        if self.events.send(Event::Task(task)).is_err() {
            tracing::debug!("UI loop finished, task dropped");
        }
    }

    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    fn show_alert(&self, title: &str, message: &str) {
        self.notify(format!("[{title}] error: {message}"));
    }

    fn show_keyboard(&self, dialog: KeyboardDialog) {
        let previous = self.lock_dialog().replace(dialog);
        drop(previous);
    }

    fn show_message(&self, title: &str, message: &str) {
        self.notify(format!("[{title}] {message}"));
    }
}

/// Runs the UI loop on the calling thread until the emulator thread reports
/// back with [`Event::Done`].
pub fn run<R: BufRead, W: Write>(
    host: &TerminalHost,
    events: &Receiver<Event>,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    loop {
        // Queued work first, so a validation message shows before the
        // dialog asks again.
        while let Ok(event) = events.try_recv() {
            match event {
                Event::Done => return Ok(()),
                Event::Task(task) => task(),
            }
        }

        let notices = mem::take(&mut *host.lock_notices());
        for notice in notices {
            writeln!(output, "{notice}")?;
        }

        let dialog = host.lock_dialog().take();
        if let Some(dialog) = dialog {
            if let Some(dialog) = prompt(dialog, input, output)? {
                host.show_keyboard(dialog);
            }
            continue;
        }

        match events.recv() {
            Ok(Event::Task(task)) => task(),
            Ok(Event::Done) | Err(_) => return Ok(()),
        }
    }
}

/// Asks for the text and a button. Returns the dialog if it is still open.
fn prompt<R: BufRead, W: Write>(
    mut dialog: KeyboardDialog,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<KeyboardDialog>> {
    let config = dialog.config();
    let multiline = config.multiline_mode;
    let confirm = config.button_config.confirm_button().unwrap_or_default();

    writeln!(
        output,
        "Software keyboard, up to {} character(s)",
        config.max_text_length
    )?;
    if let Some(hint) = &config.hint_text {
        writeln!(output, "Hint: {hint}")?;
    }
    if multiline {
        writeln!(output, "End the text with an empty line.")?;
    }
    write!(output, "> ")?;
    output.flush()?;

    let Some(raw) = read_text(input, multiline)? else {
        dialog.dismiss();
        return Ok(None);
    };

    let text = typed(&dialog, &raw);
    if text != raw {
        writeln!(output, "Filtered to: {text}")?;
    }

    let buttons = dialog
        .labels()
        .enumerate()
        .map(|(index, label)| format!("[{index}] {label}"))
        .collect::<Vec<_>>()
        .join(" ");
    write!(output, "{buttons} (Enter for {confirm}): ")?;
    output.flush()?;

    let Some(choice) = read_line(input)? else {
        dialog.dismiss();
        return Ok(None);
    };

    let button = if choice.trim().is_empty() {
        confirm
    } else if let Ok(button) = choice.trim().parse::<u8>() {
        button
    } else {
        writeln!(output, "Not a button: {choice}")?;
        return Ok(Some(dialog));
    };

    Ok(dialog.press(button, &text).err().map(|_| dialog))
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

fn read_text<R: BufRead>(input: &mut R, multiline: bool) -> io::Result<Option<String>> {
    if !multiline {
        return read_line(input);
    }

    let mut lines = Vec::new();
    while let Some(line) = read_line(input)? {
        if line.is_empty() {
            return Ok(Some(lines.join("\n")));
        }
        lines.push(line);
    }
    Ok((!lines.is_empty()).then(|| lines.join("\n")))
}

/// Feeds `raw` through the text-field filter one keystroke at a time.
fn typed(dialog: &KeyboardDialog, raw: &str) -> String {
    let filter = dialog.input_filter();
    let mut text = String::with_capacity(raw.len());

    for c in raw.chars() {
        let end = text.chars().count();
        let key = c.to_string();
        if filter.filter(&key, 0, 1, &text, end, end).is_none() {
            text.push(c);
        }
    }
    text
}
