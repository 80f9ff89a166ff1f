#![expect(non_snake_case, reason = "JNI symbol names")]

use crate::{Error, JniHost};
use jni::{
    JNIEnv,
    objects::{JClass, JObject, JString},
    sys::{jint, jlong, jstring},
};
use jni_fn::jni_fn;
use std::{
    path::Path,
    ptr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use swkbd_std::{BridgeOptions, InputFilter, KeyboardBridge, ValidationError};

static HOST: Mutex<Option<Arc<JniHost>>> = Mutex::new(None);

fn current_host() -> Result<Arc<JniHost>, Error> {
    lock_host().as_ref().map(Arc::clone).ok_or(Error::NotAttached)
}

/// Char index of the UTF-16 `offset` Java uses into `text`. An offset
/// inside a surrogate pair maps to the char it splits.
fn char_index(text: &str, offset: jint) -> usize {
    let offset = usize::try_from(offset).unwrap_or_default();
    let mut units = 0;
    text.chars()
        .take_while(|c| {
            units += c.len_utf16();
            units <= offset
        })
        .count()
}

/// Runs `filter` with the UTF-16 offsets of a Java `InputFilter` call.
fn filter_java_edit(
    filter: &InputFilter,
    source: &str,
    (start, end): (jint, jint),
    dest: &str,
    (dstart, dend): (jint, jint),
) -> Option<String> {
    filter.filter(
        source,
        char_index(source, start),
        char_index(source, end),
        dest,
        char_index(dest, dstart),
        char_index(dest, dend),
    )
}

fn lock_host() -> MutexGuard<'static, Option<Arc<JniHost>>> {
    HOST.lock().unwrap_or_else(PoisonError::into_inner)
}

fn ordinal(error: ValidationError) -> jint {
    jint::from(error.ordinal())
}

fn read_string(env: &mut JNIEnv<'_>, s: &JString<'_>) -> String {
    if s.is_null() {
        return String::new();
    }
    match env.get_string(s) {
        Ok(s) => s.into(),
        Err(e) => {
            log::error!("Failed to read Java string: {e}");
            String::new()
        }
    }
}

/// Sets up logging and the process-wide bridge, loading the bridge options
/// from `options_path` when given.
#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn nativeInit<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    options_path: JString<'local>,
) {
    crate::init_logging();

    let options_path = read_string(&mut env, &options_path);
    let options = if options_path.is_empty() {
        BridgeOptions::default()
    } else {
        BridgeOptions::load(Path::new(&options_path))
    };

    if crate::BRIDGE.set(KeyboardBridge::new(options)).is_err() {
        log::warn!("Keyboard bridge already initialized, options ignored");
    }
}

#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn nativeAttach<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) {
    match JniHost::new(&env, &activity) {
        Ok(host) => {
            let host = Arc::new(host);
            crate::keyboard_bridge().attach(&host);
            let previous = lock_host().replace(host);
            drop(previous);
            log::info!("Activity attached to the software keyboard");
        }
        Err(e) => log::error!("Failed to attach activity: {e}"),
    }
}

/// Drops the activity. Dialogs still on screen and queued UI work are
/// dismissed, so a waiting emulator thread is released.
#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn nativeDetach<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    crate::keyboard_bridge().detach();
    let host = lock_host().take();
    if let Some(host) = host {
        host.dialogs().clear();
    }
    log::info!("Activity detached from the software keyboard");
}

#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn nativeRunUiTasks<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jint {
    match current_host() {
        Ok(host) => jint::try_from(host.run_ui_tasks()).unwrap_or(jint::MAX),
        Err(e) => {
            log::debug!("UI tasks requested: {e}");
            0
        }
    }
}

/// Returns the ordinal of the validation error that keeps the dialog open,
/// 0 when the dialog closed.
#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn nativePress<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    session: jlong,
    button: jint,
    text: JString<'local>,
) -> jint {
    let text = read_string(&mut env, &text);
    let button = u8::try_from(button).unwrap_or(u8::MAX);

    match current_host() {
        Ok(host) => ordinal(host.dialogs().press(session.cast_unsigned(), button, &text)),
        Err(e) => {
            log::warn!("Button press ignored: {e}");
            ordinal(ValidationError::None)
        }
    }
}

#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn nativeDismiss<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    session: jlong,
) {
    let dismissed = current_host().is_ok_and(|host| host.dialogs().dismiss(session.cast_unsigned()));
    if !dismissed {
        log::debug!("No open keyboard for session {session}");
    }
}

#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn ValidateFilters<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    text: JString<'local>,
) -> jint {
    let text = read_string(&mut env, &text);
    ordinal(crate::keyboard_bridge().validate_filters(&text))
}

#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
pub fn ValidateInput<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    text: JString<'local>,
) -> jint {
    let text = read_string(&mut env, &text);
    ordinal(crate::keyboard_bridge().validate_input(&text))
}

/// Text-field filter. `null` accepts the edit, otherwise the returned text
/// replaces it.
#[unsafe(no_mangle)]
#[jni_fn("io.github.swkbd.applets.SoftwareKeyboard")]
#[expect(clippy::too_many_arguments, reason = "Mirrors the Java filter signature")]
pub fn nativeFilter<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    source: JString<'local>,
    start: jint,
    end: jint,
    dest: JString<'local>,
    dstart: jint,
    dend: jint,
) -> jstring {
    let Some(filter) = crate::keyboard_bridge().input_filter() else {
        return ptr::null_mut();
    };

    let source = read_string(&mut env, &source);
    let dest = read_string(&mut env, &dest);
    let Some(replacement) = filter_java_edit(&filter, &source, (start, end), &dest, (dstart, dend))
    else {
        return ptr::null_mut();
    };

    match env.new_string(replacement) {
        Ok(replacement) => replacement.into_raw(),
        Err(e) => {
            log::error!("Failed to return filtered text: {e}");
            ptr::null_mut()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swkbd_std::{ButtonConfig, ConfigValidator, Filters, KeyboardConfig};

    #[test]
    fn ordinals_match_validation_errors() {
        assert_eq!(ordinal(ValidationError::None), 0);
        assert_eq!(ordinal(ValidationError::ButtonOutOfRange), 1);
        assert_eq!(ordinal(ValidationError::EmptyInputNotAllowed), 11);
    }

    fn at_filter() -> InputFilter {
        let config = KeyboardConfig::new(ButtonConfig::Single)
            .with_max_text_length(16)
            .with_filters(Filters {
                prevent_at: true,
                ..Filters::default()
            });
        InputFilter::new(Arc::new(config), Arc::new(ConfigValidator::new()))
    }

    #[test]
    fn utf16_offsets_become_char_indices() {
        assert_eq!(char_index("AB", 1), 1);
        assert_eq!(char_index("\u{1F600}AB", 2), 1);
        assert_eq!(char_index("\u{1F600}AB", 3), 2);
        assert_eq!(char_index("\u{1F600}AB", 1), 0);
        assert_eq!(char_index("\u{e9}\u{1F600}", 3), 2);
        assert_eq!(char_index("AB", 9), 2);
        assert_eq!(char_index("AB", -3), 0);
    }

    #[test]
    fn rejected_edit_after_emoji_keeps_span() {
        let filter = at_filter();

        // Java replacing "A" in "\u{1F600}AB" spans UTF-16 units 2..3.
        assert_eq!(
            filter_java_edit(&filter, "@", (0, 1), "\u{1F600}AB", (2, 3)),
            Some("A".to_owned())
        );
        assert_eq!(
            filter_java_edit(&filter, "C", (0, 1), "\u{1F600}AB", (2, 3)),
            None
        );
    }

    #[test]
    fn emoji_source_is_inserted_whole() {
        let filter = at_filter();

        assert_eq!(
            filter_java_edit(&filter, "x\u{1F600}@", (1, 4), "AB", (2, 2)),
            Some(String::new())
        );
        assert_eq!(
            filter_java_edit(&filter, "x\u{1F600}@", (1, 3), "AB", (2, 2)),
            None
        );
    }

    #[test]
    fn no_activity_attached() {
        assert!(matches!(current_host(), Err(Error::NotAttached)));
    }
}
