use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use swkbd_core::{KeyboardConfig, KeyboardData};

/// Where a keyboard invocation currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// The dialog task was handed to the UI host but has not run yet.
    AwaitingUiDispatch,
    /// The dialog is on screen.
    AwaitingUserInput,
    Completed,
}

/// How a keyboard invocation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Another invocation was in flight.
    Busy,
    /// The dialog went away without a button press.
    Dismissed,
    Submitted(KeyboardData),
    TimedOut,
    /// The request was invalid or no UI could show it.
    Unavailable,
}

impl Completion {
    /// The value the emulator receives. Anything but a submission maps to
    /// [`KeyboardData::placeholder`].
    #[must_use]
    pub fn into_data(self) -> KeyboardData {
        match self {
            Self::Submitted(data) => data,
            Self::Busy | Self::Dismissed | Self::TimedOut | Self::Unavailable => {
                KeyboardData::placeholder()
            }
        }
    }

    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

#[derive(Default)]
struct State {
    completion: Option<Completion>,
    phase: Phase,
}

/// Single-slot rendezvous shared by the waiting emulator thread and the
/// dialog living on the UI thread.
///
/// Phase and result share one lock; the condition variable is notified with
/// that lock held, after the result is stored.
pub struct Session {
    config: Arc<KeyboardConfig>,
    done: Condvar,
    id: u64,
    state: Mutex<State>,
}

impl Session {
    /// Stores `completion` and wakes the waiter.
    ///
    /// Returns `false` if the session had already completed, in which case
    /// `completion` is dropped.
    pub fn complete(&self, completion: Completion) -> bool {
        let mut state = self.lock();

        if state.phase == Phase::Completed {
            tracing::debug!(session = self.id, ?completion, "late keyboard completion ignored");
            return false;
        }

        state.completion = Some(completion);
        state.phase = Phase::Completed;
        self.done.notify_all();
        true
    }

    #[must_use]
    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    #[must_use]
    pub fn config_arc(&self) -> Arc<KeyboardConfig> {
        Arc::clone(&self.config)
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.lock().phase == Phase::Completed
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // The state is plain data, a panic while holding the lock can't
        // leave it half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `Idle -> AwaitingUiDispatch`.
    pub fn mark_dispatched(&self) {
        let mut state = self.lock();
        if state.phase == Phase::Idle {
            state.phase = Phase::AwaitingUiDispatch;
        }
    }

    /// `AwaitingUiDispatch -> AwaitingUserInput`.
    ///
    /// Returns `false` if the session completed before the UI got to it, the
    /// dialog must not be shown then.
    pub fn mark_presented(&self) -> bool {
        let mut state = self.lock();
        match state.phase {
            Phase::Idle | Phase::AwaitingUiDispatch => {
                state.phase = Phase::AwaitingUserInput;
                true
            }
            Phase::AwaitingUserInput => true,
            Phase::Completed => false,
        }
    }

    #[must_use]
    pub fn new(id: u64, config: Arc<KeyboardConfig>) -> Arc<Self> {
        Arc::new(Self {
            config,
            done: Condvar::new(),
            id,
            state: Mutex::new(State::default()),
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Blocks until the session completes or `timeout` elapses.
    ///
    /// Wakeups that find the session still open go back to waiting. On
    /// timeout the session is closed as [`Completion::TimedOut`] so a late
    /// answer from the UI is discarded.
    pub fn wait(&self, timeout: Option<Duration>) -> Completion {
        let open = |state: &mut State| state.phase != Phase::Completed;
        let guard = self.lock();

        let mut state = match timeout {
            None => self
                .done
                .wait_while(guard, open)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                let (mut state, result) = self
                    .done
                    .wait_timeout_while(guard, timeout, open)
                    .unwrap_or_else(PoisonError::into_inner);

                if result.timed_out() && state.phase != Phase::Completed {
                    tracing::warn!(session = self.id, ?timeout, "keyboard dialog timed out");
                    state.completion = Some(Completion::TimedOut);
                    state.phase = Phase::Completed;
                }

                state
            }
        };

        state.completion.take().unwrap_or(Completion::Dismissed)
    }
}
