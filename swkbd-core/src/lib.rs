//! # Software keyboard applet core
//!
//! Data model and input validation for the emulated console's software
//! keyboard applet. The emulator core builds a [`KeyboardConfig`] for every
//! applet invocation and expects a [`KeyboardData`] back; a [`Validator`]
//! decides which text the applet is allowed to return.
//!
//! This crate has no notion of threads or UIs, see `swkbd-std` for the
//! blocking bridge between the emulator thread and a UI thread.
//!
//! ## Tracing
//!
//! Rejected input is reported through `tracing` under the `swkbd_core`
//! target at `debug` level. Install a subscriber in your application to see
//! it.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod config;
mod data;
mod error;
mod validation;

pub use {
    config::{AcceptedInput, ButtonConfig, ButtonText, Filters, KeyboardConfig, MAX_BUTTONS},
    data::KeyboardData,
    error::Error,
    validation::{ConfigValidator, InputCallback, ValidationError, Validator, check_accept_mode},
};
