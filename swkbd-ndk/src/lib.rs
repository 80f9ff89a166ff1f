//! Android bindings for the software keyboard bridge.
//!
//! The emulator core runs [`keyboard_bridge`]`().execute(..)` on its own
//! thread; the Java activity drives the dialog through the `native*`
//! exports of `io.github.swkbd.applets.SoftwareKeyboard`.

mod error;
mod ffi;
mod host;
mod registry;

pub use error::Error;
pub use ffi::*;
pub use host::JniHost;
use once_cell::sync::OnceCell;
pub use registry::DialogRegistry;
use swkbd_std::KeyboardBridge;

static BRIDGE: OnceCell<KeyboardBridge> = OnceCell::new();

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("SoftwareKeyboard"),
    );

    log::info!("Software keyboard bridge loaded");
}

/// The process-wide bridge. Uses default options unless `nativeInit` ran
/// first.
pub fn keyboard_bridge() -> &'static KeyboardBridge {
    BRIDGE.get_or_init(KeyboardBridge::default)
}
