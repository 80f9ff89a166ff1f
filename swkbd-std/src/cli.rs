use crate::{BridgeOptions, Error};
pub use clap;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use swkbd_core::{AcceptedInput, ButtonConfig, Filters, KeyboardConfig};

pub const SWKBD_BIN: &str = "swkbd";
const ABOUT: &str = "Drive the emulator's software keyboard applet from a terminal.";
const AFTER_HELP: &str = "Dialog controls:

    Type the text and press Enter, then pick a button by number.
    An empty button choice presses the rightmost (confirm) button.
    End of input (Ctrl-D) dismisses the dialog.
";

pub trait AppOption: Default + Clone + Copy + clap::ValueEnum {
    fn iter() -> impl Iterator<Item = Self>;
    fn str(self) -> &'static str;
}

#[derive(Default, Clone, Copy, clap::ValueEnum)]
enum Buttons {
    Dual,
    #[default]
    Single,
    Triple,
}

impl AppOption for Buttons {
    fn iter() -> impl Iterator<Item = Self> {
        [Self::Single, Self::Dual, Self::Triple].into_iter()
    }

    fn str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Dual => "dual",
            Self::Triple => "triple",
        }
    }
}

impl From<Buttons> for ButtonConfig {
    #[inline]
    fn from(buttons: Buttons) -> Self {
        match buttons {
            Buttons::Single => Self::Single,
            Buttons::Dual => Self::Dual,
            Buttons::Triple => Self::Triple,
        }
    }
}

#[derive(Default, Clone, Copy, clap::ValueEnum)]
enum Accept {
    #[default]
    Anything,
    FixedLength,
    NotBlank,
    NotEmpty,
    NotEmptyAndNotBlank,
}

impl AppOption for Accept {
    fn iter() -> impl Iterator<Item = Self> {
        [
            Self::Anything,
            Self::NotEmpty,
            Self::NotBlank,
            Self::NotEmptyAndNotBlank,
            Self::FixedLength,
        ]
        .into_iter()
    }

    fn str(self) -> &'static str {
        match self {
            Self::Anything => "anything",
            Self::NotEmpty => "not-empty",
            Self::NotBlank => "not-blank",
            Self::NotEmptyAndNotBlank => "not-empty-and-not-blank",
            Self::FixedLength => "fixed-length",
        }
    }
}

impl From<Accept> for AcceptedInput {
    #[inline]
    fn from(accept: Accept) -> Self {
        match accept {
            Accept::Anything => Self::Anything,
            Accept::NotEmpty => Self::NotEmpty,
            Accept::NotBlank => Self::NotBlank,
            Accept::NotEmptyAndNotBlank => Self::NotEmptyAndNotBlank,
            Accept::FixedLength => Self::FixedLength,
        }
    }
}

#[derive(clap::Parser, Default)]
#[command(name = SWKBD_BIN, about = ABOUT, after_help = AFTER_HELP)]
#[expect(clippy::struct_excessive_bools, reason = "One flag per keyboard filter")]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Which inputs the keyboard accepts on submission",
        default_value = Accept::default().str(),
        value_enum,
        required = false
    )]
    accept: Accept,
    #[arg(
        short,
        long,
        help = "Button layout of the dialog",
        default_value = Buttons::default().str(),
        value_enum,
        required = false
    )]
    buttons: Buttons,
    #[arg(
        long = "label",
        help = "Button label, repeat once per button from left to right"
    )]
    labels: Vec<String>,
    #[arg(
        short,
        long,
        help = "Bridge options file (JSON)",
        long_help = "Bridge options file (JSON). Holds the dialog timeout and the \
           words rejected by the profanity filter. Missing or malformed files \
           fall back to the defaults."
    )]
    config: Option<PathBuf>,
    #[arg(long, help = "Hint shown in the empty text field")]
    hint: Option<String>,
    #[arg(long, help = "Maximum number of digits when digits are filtered")]
    max_digits: Option<u16>,
    #[arg(short, long, help = "Maximum text length", default_value_t = 32)]
    max_length: u16,
    #[arg(long, help = "Accept multiple lines of input")]
    multiline: bool,
    #[arg(long, help = "Reject '@'")]
    prevent_at: bool,
    #[arg(long, help = "Reject '\\'")]
    prevent_backslash: bool,
    #[arg(long, help = "Reject profanity listed in the options file")]
    prevent_profanity: bool,
    #[arg(long, help = "Reject '%'")]
    prevent_percent: bool,
    #[arg(
        short,
        long,
        help = "Give up waiting for the dialog after this many milliseconds"
    )]
    timeout_ms: Option<u64>,
    #[arg(short, long, help = "Log bridge activity at debug level")]
    verbose: bool,
}

impl Cli {
    #[must_use]
    #[inline]
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Keyboard invocation described by the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if more labels than buttons were given.
    #[inline]
    pub fn keyboard_config(&self) -> Result<KeyboardConfig, Error> {
        let mut config = KeyboardConfig::new(self.buttons.into())
            .with_accept_mode(self.accept.into())
            .with_max_text_length(self.max_length)
            .with_multiline_mode(self.multiline)
            .with_filters(Filters {
                prevent_at: self.prevent_at,
                prevent_backslash: self.prevent_backslash,
                prevent_digit: self.max_digits.is_some(),
                prevent_percent: self.prevent_percent,
                prevent_profanity: self.prevent_profanity,
                ..Filters::default()
            })
            .with_button_text(&self.labels)?;

        if let Some(max_digits) = self.max_digits {
            config = config.with_max_digits(max_digits);
        }
        if let Some(hint) = &self.hint {
            config = config.with_hint_text(hint);
        }

        config.check()?;
        Ok(config)
    }

    /// Bridge options from `--config`, or from `default_path` when it wasn't
    /// given. The command line timeout takes precedence.
    #[must_use]
    #[inline]
    pub fn options(&self, default_path: Option<&Path>) -> BridgeOptions {
        let options = self
            .config_path()
            .or(default_path)
            .map_or_else(BridgeOptions::default, BridgeOptions::load);

        match self.timeout_ms {
            Some(timeout_ms) => options.with_timeout(Some(Duration::from_millis(timeout_ms))),
            None => options,
        }
    }

    #[must_use]
    #[inline]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }
}
