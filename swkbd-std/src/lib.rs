mod bridge;
#[cfg(feature = "cli")]
pub mod cli;
mod dialog;
mod error;
mod filter;
mod host;
pub mod logging;
pub mod messages;
mod options;
mod session;

pub use bridge::KeyboardBridge;
pub use dialog::KeyboardDialog;
pub use error::Error;
pub use filter::InputFilter;
pub use host::{HostSlot, UiHost, UiTask};
pub use options::BridgeOptions;
pub use session::{Completion, Phase, Session};
pub use swkbd_core::{
    AcceptedInput, ButtonConfig, ConfigValidator, Filters, KeyboardConfig, KeyboardData,
    ValidationError, Validator,
};
